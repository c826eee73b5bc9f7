use crate::release_analysis::domain::{
    CircularDependencyChain, ComponentKey, DeduplicatedForest, ReleaseGraph, ReleaseNodeId,
    ReportMetadata,
};
use crate::release_analysis::services::{CyclePolicy, ResolutionFailure};
use crate::shared::error::AnalysisError;
use serde::Serialize;

/// A component left out of release grouping, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedComponent {
    pub component: ComponentKey,
    pub reason: String,
}

/// Counts and reasons reported at the end of every run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Distinct components seen by the walker
    pub components: usize,
    /// Components placed into a release unit
    pub processed: usize,
    pub skipped: Vec<SkippedComponent>,
    pub failed: Vec<ResolutionFailure>,
    pub release_units: usize,
    pub cycles: usize,
    pub occurrences: usize,
    pub unique_entries: usize,
    pub cycle_policy: CyclePolicy,
}

impl RunSummary {
    /// Whether the run found a condition that must fail CI
    ///
    /// Collected resolution failures are always fatal; cycles are fatal unless
    /// the cycle policy is `warn`.
    pub fn is_fatal(&self) -> bool {
        !self.failed.is_empty() || (self.cycles > 0 && self.cycle_policy == CyclePolicy::Fail)
    }
}

/// AnalysisResponse - everything one analysis run produced
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub metadata: ReportMetadata,
    pub release_graph: ReleaseGraph,
    /// Release units, dependencies first
    pub build_order: Vec<ReleaseNodeId>,
    pub cycles: Vec<CircularDependencyChain>,
    pub deduplicated: DeduplicatedForest,
    pub summary: RunSummary,
}

impl AnalysisResponse {
    pub fn new(
        metadata: ReportMetadata,
        release_graph: ReleaseGraph,
        build_order: Vec<ReleaseNodeId>,
        cycles: Vec<CircularDependencyChain>,
        deduplicated: DeduplicatedForest,
        summary: RunSummary,
    ) -> Self {
        Self {
            metadata,
            release_graph,
            build_order,
            cycles,
            deduplicated,
            summary,
        }
    }

    /// The error a consumer needing a dependency-respecting order must raise
    ///
    /// `None` when there are no cycles or the cycle policy is `warn`.
    pub fn cycle_error(&self) -> Option<AnalysisError> {
        if self.cycles.is_empty() || self.summary.cycle_policy == CyclePolicy::Warn {
            return None;
        }
        let chains = self
            .cycles
            .iter()
            .map(|c| format!("  - {}", c))
            .collect::<Vec<_>>()
            .join("\n");
        Some(AnalysisError::CircularDependency {
            count: self.cycles.len(),
            chains,
        })
    }
}
