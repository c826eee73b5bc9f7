use crate::application::dto::AnalysisResponse;
use crate::shared::Result;

/// ReportFormatter port turning an analysis result into text
pub trait ReportFormatter {
    /// Formats the analysis response
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, response: &AnalysisResponse) -> Result<String>;
}
