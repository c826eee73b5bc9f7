use crate::release_analysis::domain::{
    ComponentKey, ComponentMetadata, ReleaseGraph, ReleaseNodeId, ReleaseRevision,
};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// What a caller does when a component's release cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Stop the whole run at the first failure
    #[default]
    AbortOnFirstFailure,
    /// Skip the component, keep resolving its siblings, report at the end
    CollectAndContinue,
}

impl FromStr for ResolutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(ResolutionPolicy::AbortOnFirstFailure),
            "collect" => Ok(ResolutionPolicy::CollectAndContinue),
            _ => Err(format!(
                "Invalid resolution policy: {}. Valid values are: abort, collect",
                s
            )),
        }
    }
}

impl fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionPolicy::AbortOnFirstFailure => write!(f, "abort"),
            ResolutionPolicy::CollectAndContinue => write!(f, "collect"),
        }
    }
}

/// A component whose release revision could not be determined
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionFailure {
    pub component: ComponentKey,
    pub reason: String,
}

impl ResolutionFailure {
    pub fn new(component: ComponentKey, reason: impl Into<String>) -> Self {
        Self {
            component,
            reason: reason.into(),
        }
    }

    /// Converts the failure into the error raised under [`ResolutionPolicy::AbortOnFirstFailure`]
    pub fn into_error(self) -> AnalysisError {
        AnalysisError::Resolution {
            component: self.component.to_string(),
            details: self.reason,
        }
    }
}

/// Release graph plus the bookkeeping gathered while building it
#[derive(Debug, Clone)]
pub struct BuiltReleaseGraph {
    pub graph: ReleaseGraph,
    pub failures: Vec<ResolutionFailure>,
    /// Release units dropped because every member was excluded
    pub pruned_nodes: usize,
    /// Component edges that stayed inside one release unit
    pub intra_release_edges: usize,
    /// Component edges touching an excluded or unresolved component
    pub dangling_edges: usize,
}

/// ReleaseGraphBuilder service grouping components into release units
///
/// Resolution itself happens outside; the builder only records resolved
/// components and per-component failures, and leaves the abort/continue
/// decision to the caller.
#[derive(Debug, Default)]
pub struct ReleaseGraphBuilder {
    graph: ReleaseGraph,
    failures: Vec<ResolutionFailure>,
}

impl ReleaseGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component to the release unit of `revision`, creating the unit on first sighting
    pub fn add_component(
        &mut self,
        key: ComponentKey,
        metadata: ComponentMetadata,
        revision: &ReleaseRevision,
    ) -> ReleaseNodeId {
        let id = self.graph.get_or_create(revision);
        self.graph.add_member(id, key, metadata);
        id
    }

    /// Records a component that could not be resolved
    pub fn record_failure(&mut self, failure: ResolutionFailure) {
        self.failures.push(failure);
    }

    /// Removes a component after external filtering
    ///
    /// Returns false if the component was never added.
    pub fn exclude_component(&mut self, key: &ComponentKey) -> bool {
        self.graph.remove_member(key)
    }

    pub fn failures(&self) -> &[ResolutionFailure] {
        &self.failures
    }

    pub fn component_count(&self) -> usize {
        self.graph.nodes().iter().map(|n| n.members().len()).sum()
    }

    /// Prunes empty release units, then wires the cross-release edges
    ///
    /// # Arguments
    /// * `edges` - Direct component dependency edges `(dependant, dependency)`
    pub fn build(mut self, edges: &[(ComponentKey, ComponentKey)]) -> BuiltReleaseGraph {
        let pruned_nodes = self.graph.prune_empty();
        let mut intra_release_edges = 0;
        let mut dangling_edges = 0;

        for (from, to) in edges {
            let from_release = self.graph.release_of(from).map(|n| n.id());
            let to_release = self.graph.release_of(to).map(|n| n.id());

            match (from_release, to_release) {
                (Some(a), Some(b)) if a == b => intra_release_edges += 1,
                (Some(a), Some(b)) => {
                    self.graph.add_dependency(a, b);
                }
                _ => dangling_edges += 1,
            }
        }

        BuiltReleaseGraph {
            graph: self.graph,
            failures: self.failures,
            pruned_nodes,
            intra_release_edges,
            dangling_edges,
        }
    }
}

/// Applies `policy` to a resolution failure
///
/// # Errors
/// Returns the failure as an error under [`ResolutionPolicy::AbortOnFirstFailure`]
pub fn apply_policy(
    builder: &mut ReleaseGraphBuilder,
    policy: ResolutionPolicy,
    failure: ResolutionFailure,
) -> Result<()> {
    match policy {
        ResolutionPolicy::AbortOnFirstFailure => Err(failure.into_error().into()),
        ResolutionPolicy::CollectAndContinue => {
            builder.record_failure(failure);
            Ok(())
        }
    }
}
