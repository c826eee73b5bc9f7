use super::{CanonicalId, ComponentKey, ComponentMetadata, ScmReference};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use std::ops::Index;
use std::sync::OnceLock;

/// Arena index of an occurrence inside its [`Forest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccurrenceId(usize);

impl OccurrenceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of a structural variation in the deduplicator's variation arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariationId(pub(crate) usize);

/// One visit of a component at one position of the forest
///
/// Everything except the two identity cells is fixed when the walker leaves
/// the node. The cells are written once, bottom-up, by the deduplicator.
#[derive(Debug)]
pub struct Occurrence {
    id: OccurrenceId,
    parent: Option<OccurrenceId>,
    key: ComponentKey,
    children: Vec<(ComponentKey, OccurrenceId)>,
    metadata: ComponentMetadata,
    scm: ScmReference,
    variation: OnceLock<VariationId>,
    canonical_id: OnceLock<CanonicalId>,
}

impl Occurrence {
    pub fn id(&self) -> OccurrenceId {
        self.id
    }

    pub fn parent(&self) -> Option<OccurrenceId> {
        self.parent
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    pub fn metadata(&self) -> &ComponentMetadata {
        &self.metadata
    }

    pub fn scm(&self) -> &ScmReference {
        &self.scm
    }

    /// Children in walk order, keyed uniquely by component
    pub fn children(&self) -> &[(ComponentKey, OccurrenceId)] {
        &self.children
    }

    pub fn child(&self, key: &ComponentKey) -> Option<OccurrenceId> {
        self.children
            .iter()
            .find(|(child_key, _)| child_key == key)
            .map(|(_, id)| *id)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn variation(&self) -> Option<VariationId> {
        self.variation.get().copied()
    }

    pub fn canonical_id(&self) -> Option<&CanonicalId> {
        self.canonical_id.get()
    }

    pub(crate) fn assign_variation(&self, variation: VariationId) -> Result<()> {
        self.variation.set(variation).map_err(|_| {
            AnalysisError::invariant(format!(
                "occurrence {} of {} was resolved twice",
                self.id.0, self.key
            ))
        })?;
        Ok(())
    }

    pub(crate) fn assign_canonical_id(&self, id: CanonicalId) -> Result<()> {
        self.canonical_id.set(id).map_err(|_| {
            AnalysisError::invariant(format!(
                "occurrence {} of {} already carries a canonical id",
                self.id.0, self.key
            ))
        })?;
        Ok(())
    }
}

/// Arena holding every occurrence of a walked forest
#[derive(Debug, Default)]
pub struct Forest {
    occurrences: Vec<Occurrence>,
    roots: Vec<OccurrenceId>,
}

impl Forest {
    pub fn builder() -> ForestBuilder {
        ForestBuilder::default()
    }

    /// Root occurrences in discovery order
    pub fn roots(&self) -> &[OccurrenceId] {
        &self.roots
    }

    pub fn get(&self, id: OccurrenceId) -> Option<&Occurrence> {
        self.occurrences.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Occurrences in discovery (pre-)order
    pub fn iter(&self) -> impl Iterator<Item = &Occurrence> {
        self.occurrences.iter()
    }

    /// Deterministic sequential post-order of the tree under `root`
    pub fn post_order(&self, root: OccurrenceId) -> Vec<OccurrenceId> {
        let mut order = Vec::new();
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            for (_, child) in self[id].children.iter().rev() {
                stack.push((*child, false));
            }
        }

        order
    }

    /// Clears every variation and canonical id so the forest can be deduplicated again
    pub fn reset_identities(&mut self) {
        for occurrence in &mut self.occurrences {
            occurrence.variation.take();
            occurrence.canonical_id.take();
        }
    }
}

impl Index<OccurrenceId> for Forest {
    type Output = Occurrence;

    fn index(&self, id: OccurrenceId) -> &Self::Output {
        &self.occurrences[id.0]
    }
}

/// Builds a [`Forest`] from a depth-first enter/leave event sequence
#[derive(Debug, Default)]
pub struct ForestBuilder {
    occurrences: Vec<Occurrence>,
    roots: Vec<OccurrenceId>,
    stack: Vec<OccurrenceId>,
}

impl ForestBuilder {
    /// Opens a new occurrence below the currently open one (or as a new root)
    ///
    /// # Errors
    /// Returns an error if the open parent already has a child with the same key.
    pub fn enter(
        &mut self,
        key: ComponentKey,
        metadata: ComponentMetadata,
        scm: ScmReference,
    ) -> Result<OccurrenceId> {
        let id = OccurrenceId(self.occurrences.len());
        let parent = self.stack.last().copied();

        match parent {
            Some(parent_id) => {
                let parent_node = &mut self.occurrences[parent_id.0];
                if parent_node.children.iter().any(|(k, _)| k == &key) {
                    return Err(AnalysisError::Validation {
                        message: format!(
                            "{} is declared twice as a direct dependency of {}",
                            key, parent_node.key
                        ),
                    }
                    .into());
                }
                parent_node.children.push((key.clone(), id));
            }
            None => self.roots.push(id),
        }

        self.occurrences.push(Occurrence {
            id,
            parent,
            key,
            children: Vec::new(),
            metadata,
            scm,
            variation: OnceLock::new(),
            canonical_id: OnceLock::new(),
        });
        self.stack.push(id);
        Ok(id)
    }

    /// Closes the most recently opened occurrence
    pub fn leave(&mut self) -> Result<OccurrenceId> {
        self.stack.pop().ok_or_else(|| {
            AnalysisError::invariant("leave event without a matching enter event").into()
        })
    }

    pub fn build(self) -> Result<Forest> {
        if !self.stack.is_empty() {
            return Err(AnalysisError::invariant(format!(
                "forest walk ended with {} unclosed occurrence(s)",
                self.stack.len()
            ))
            .into());
        }
        Ok(Forest {
            occurrences: self.occurrences,
            roots: self.roots,
        })
    }
}
