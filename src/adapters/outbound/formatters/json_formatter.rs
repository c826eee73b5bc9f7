use crate::application::dto::AnalysisResponse;
use crate::application::read_models::ReportReadModelBuilder;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// JsonFormatter adapter rendering the report read model as pretty JSON
///
/// This adapter implements the ReportFormatter port for JSON format.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, response: &AnalysisResponse) -> Result<String> {
        let model = ReportReadModelBuilder::build(response);
        serde_json::to_string_pretty(&model).map_err(Into::into)
    }
}
