//! Report read model for query operations

use serde::Serialize;

/// Main read model for analysis reports
///
/// Components and revisions are flattened to their display strings so the
/// model serializes directly into the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportReadModel {
    pub metadata: ReportMetadataView,
    /// Release units in build order, dependencies first
    pub release_units: Vec<ReleaseUnitView>,
    pub cycles: Vec<CycleView>,
    pub manifest: ManifestView,
    pub summary: SummaryView,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadataView {
    pub timestamp: String,
    pub tool_name: String,
    pub tool_version: String,
    pub run_id: String,
}

/// View representation of one release unit
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseUnitView {
    /// 1-based position in the build order
    pub position: usize,
    /// `origin@tag`
    pub revision: String,
    pub origin: String,
    pub tag: String,
    /// Member locators, sorted
    pub members: Vec<String>,
    /// Revisions this unit must be built after
    pub depends_on: Vec<String>,
    /// Whether the unit takes part in a circular dependency
    pub in_cycle: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleView {
    /// Revisions as walked, first repeated at the end
    pub chain: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestView {
    pub roots: Vec<String>,
    pub entries: Vec<ManifestEntryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntryView {
    pub canonical_id: String,
    pub locator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub components: usize,
    pub processed: usize,
    pub skipped: Vec<SkippedView>,
    pub failed: Vec<FailureView>,
    pub release_units: usize,
    pub cycles: usize,
    pub cycle_policy: String,
    pub occurrences: usize,
    pub unique_entries: usize,
    pub fatal: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedView {
    pub component: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureView {
    pub component: String,
    pub reason: String,
}
