use crate::release_analysis::services::{CyclePolicy, ResolutionPolicy};

/// AnalysisRequest - options of one forest analysis run
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// Wildcard patterns over `group:name` removed from release grouping
    pub exclude_patterns: Vec<String>,
    /// Keep components not built by the analysed project set
    pub include_unmanaged: bool,
    pub resolution_policy: ResolutionPolicy,
    pub cycle_policy: CyclePolicy,
}

impl AnalysisRequest {
    pub fn new(
        exclude_patterns: Vec<String>,
        include_unmanaged: bool,
        resolution_policy: ResolutionPolicy,
        cycle_policy: CyclePolicy,
    ) -> Self {
        Self {
            exclude_patterns,
            include_unmanaged,
            resolution_policy,
            cycle_policy,
        }
    }
}
