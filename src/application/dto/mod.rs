/// Data Transfer Objects for the application layer
///
/// DTOs carry data between the use case and the adapters, keeping the
/// release_analysis layer isolated from CLI and output concerns.
mod analysis_request;
mod analysis_response;
mod output_format;

pub use analysis_request::AnalysisRequest;
pub use analysis_response::{AnalysisResponse, RunSummary, SkippedComponent};
pub use output_format::OutputFormat;
