use crate::ports::outbound::{ForestVisitor, WalkedNode};
use crate::release_analysis::domain::{ComponentKey, ComponentRecord, Forest, ForestBuilder};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use std::collections::HashSet;

/// Everything gathered from one forest walk
#[derive(Debug)]
pub struct CollectedForest {
    /// Occurrence arena for deduplication
    pub forest: Forest,
    /// Distinct components in first-sighting order
    pub components: Vec<ComponentRecord>,
    /// Direct `(dependant, dependency)` edges, deduplicated
    pub edges: Vec<(ComponentKey, ComponentKey)>,
}

/// ForestVisitor turning the walker's event stream into domain facts
///
/// Builds the node-level occurrence forest and, in the same pass, the
/// component-level records and edges used for release grouping.
#[derive(Debug, Default)]
pub struct ForestCollector {
    builder: ForestBuilder,
    path: Vec<ComponentKey>,
    components: Vec<ComponentRecord>,
    known: HashSet<ComponentKey>,
    edges: Vec<(ComponentKey, ComponentKey)>,
    known_edges: HashSet<(ComponentKey, ComponentKey)>,
}

impl ForestCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Result<CollectedForest> {
        Ok(CollectedForest {
            forest: self.builder.build()?,
            components: self.components,
            edges: self.edges,
        })
    }
}

impl ForestVisitor for ForestCollector {
    fn enter(&mut self, node: &WalkedNode) -> Result<()> {
        self.builder
            .enter(node.key.clone(), node.metadata.clone(), node.scm.clone())?;

        if let Some(parent) = self.path.last() {
            let edge = (parent.clone(), node.key.clone());
            if self.known_edges.insert(edge.clone()) {
                self.edges.push(edge);
            }
        }

        if self.known.insert(node.key.clone()) {
            self.components.push(ComponentRecord {
                key: node.key.clone(),
                metadata: node.metadata.clone(),
                scm: node.scm.clone(),
            });
        }

        self.path.push(node.key.clone());
        Ok(())
    }

    fn leave(&mut self, node: &WalkedNode) -> Result<()> {
        self.builder.leave()?;
        match self.path.pop() {
            Some(open) if open == node.key => Ok(()),
            Some(open) => Err(AnalysisError::invariant(format!(
                "walker left {} while {} was open",
                node.key, open
            ))
            .into()),
            None => Err(AnalysisError::invariant(format!(
                "walker left {} without entering it",
                node.key
            ))
            .into()),
        }
    }
}
