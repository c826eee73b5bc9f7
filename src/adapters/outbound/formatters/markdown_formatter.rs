use crate::application::dto::AnalysisResponse;
use crate::application::read_models::{
    CycleView, ManifestView, ReleaseUnitView, ReportMetadataView, ReportReadModelBuilder,
    SummaryView,
};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// Markdown table header for release units
const RELEASE_TABLE_HEADER: &str = "| # | Release | Members | Depends on |\n";

/// Markdown table separator line for release units
const RELEASE_TABLE_SEPARATOR: &str = "|---|---------|---------|------------|\n";

/// Markdown table header for manifest entries
const MANIFEST_TABLE_HEADER: &str = "| Canonical ID | Release | Repository | Dependencies |\n";

/// Markdown table separator line for manifest entries
const MANIFEST_TABLE_SEPARATOR: &str = "|--------------|---------|------------|--------------|\n";

/// MarkdownFormatter adapter for a human-readable release report
///
/// This adapter implements the ReportFormatter port for Markdown format.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn code_list(items: &[String]) -> String {
        if items.is_empty() {
            return "-".to_string();
        }
        items
            .iter()
            .map(|item| format!("`{}`", Self::escape_markdown_table_cell(item)))
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper methods for rendering sections
impl MarkdownFormatter {
    fn render_header(&self, output: &mut String, metadata: &ReportMetadataView) {
        output.push_str("# Release Forest Report\n\n");
        output.push_str(&format!(
            "- Generated: {}\n- Tool: {} {}\n- Run: `{}`\n\n",
            metadata.timestamp, metadata.tool_name, metadata.tool_version, metadata.run_id
        ));
    }

    fn render_build_order(&self, output: &mut String, units: &[ReleaseUnitView]) {
        output.push_str("## Build Order\n\n");
        if units.is_empty() {
            output.push_str("*No release units*\n\n");
            return;
        }

        output.push_str("Release units listed so that every unit follows the units it depends on.\n\n");
        output.push_str(RELEASE_TABLE_HEADER);
        output.push_str(RELEASE_TABLE_SEPARATOR);
        for unit in units {
            let marker = if unit.in_cycle { " ⚠️" } else { "" };
            output.push_str(&format!(
                "| {} | `{}`{} | {} | {} |\n",
                unit.position,
                Self::escape_markdown_table_cell(&unit.revision),
                marker,
                Self::code_list(&unit.members),
                Self::code_list(&unit.depends_on)
            ));
        }
        output.push('\n');
    }

    fn render_cycles(&self, output: &mut String, cycles: &[CycleView]) {
        if cycles.is_empty() {
            return;
        }

        output.push_str("## Circular Dependencies\n\n");
        output.push_str(
            "Release units in these chains cannot be ordered; the build order above breaks each loop arbitrarily.\n\n",
        );
        for cycle in cycles {
            output.push_str(&format!("- `{}`\n", cycle.chain.join(" -> ")));
        }
        output.push('\n');
    }

    fn render_manifest(&self, output: &mut String, manifest: &ManifestView) {
        output.push_str("## Deduplicated Manifest\n\n");
        if manifest.entries.is_empty() {
            output.push_str("*No components*\n\n");
            return;
        }

        output.push_str(&format!(
            "Roots: {}\n\n",
            manifest
                .roots
                .iter()
                .map(|r| format!("`{}`", r))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str(MANIFEST_TABLE_HEADER);
        output.push_str(MANIFEST_TABLE_SEPARATOR);
        for entry in &manifest.entries {
            output.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                Self::escape_markdown_table_cell(&entry.canonical_id),
                entry
                    .revision
                    .as_deref()
                    .map(|r| format!("`{}`", Self::escape_markdown_table_cell(r)))
                    .unwrap_or_else(|| "-".to_string()),
                Self::escape_markdown_table_cell(entry.repository.as_deref().unwrap_or("N/A")),
                Self::code_list(&entry.dependencies)
            ));
        }
        output.push('\n');
    }

    fn render_summary(&self, output: &mut String, summary: &SummaryView) {
        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "| Metric | Value |\n|--------|-------|\n\
             | Components | {} |\n\
             | Processed | {} |\n\
             | Skipped | {} |\n\
             | Failed | {} |\n\
             | Release units | {} |\n\
             | Cycles | {} (policy: {}) |\n\
             | Occurrences | {} |\n\
             | Unique entries | {} |\n\n",
            summary.components,
            summary.processed,
            summary.skipped.len(),
            summary.failed.len(),
            summary.release_units,
            summary.cycles,
            summary.cycle_policy,
            summary.occurrences,
            summary.unique_entries
        ));

        if !summary.skipped.is_empty() {
            output.push_str("### Skipped Components\n\n");
            for skipped in &summary.skipped {
                output.push_str(&format!("- `{}`: {}\n", skipped.component, skipped.reason));
            }
            output.push('\n');
        }

        if !summary.failed.is_empty() {
            output.push_str("### Failed Components\n\n");
            for failed in &summary.failed {
                output.push_str(&format!("- `{}`: {}\n", failed.component, failed.reason));
            }
            output.push('\n');
        }

        if summary.fatal {
            output.push_str("**Result: FAILED**\n");
        } else {
            output.push_str("**Result: OK**\n");
        }
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format(&self, response: &AnalysisResponse) -> Result<String> {
        let model = ReportReadModelBuilder::build(response);
        let mut output = String::new();

        self.render_header(&mut output, &model.metadata);
        self.render_build_order(&mut output, &model.release_units);
        self.render_cycles(&mut output, &model.cycles);
        self.render_manifest(&mut output, &model.manifest);
        self.render_summary(&mut output, &model.summary);

        Ok(output)
    }
}
