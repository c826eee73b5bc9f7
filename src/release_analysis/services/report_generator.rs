use crate::release_analysis::domain::ReportMetadata;
use chrono::Utc;
use uuid::Uuid;

/// ReportGenerator service stamping analysis reports
pub struct ReportGenerator;

impl ReportGenerator {
    /// Generates metadata with the current timestamp and a fresh run id
    pub fn generate_metadata(tool_name: &str, tool_version: &str) -> ReportMetadata {
        let timestamp = Utc::now().to_rfc3339();
        let run_id = format!("urn:uuid:{}", Uuid::new_v4());

        ReportMetadata::new(
            timestamp,
            tool_name.to_string(),
            tool_version.to_string(),
            run_id,
        )
    }

    /// Metadata for this tool, using the compile-time package version
    pub fn generate_default_metadata() -> ReportMetadata {
        Self::generate_metadata(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}
