//! Builder for constructing ReportReadModel from an analysis response

use super::report_read_model::{
    CycleView, FailureView, ManifestEntryView, ManifestView, ReleaseUnitView, ReportMetadataView,
    ReportReadModel, SkippedView, SummaryView,
};
use crate::application::dto::{AnalysisResponse, RunSummary};
use crate::release_analysis::domain::{
    CircularDependencyChain, DeduplicatedForest, ReleaseGraph, ReleaseNodeId, ReportMetadata,
};
use crate::release_analysis::services::CycleDetector;
use std::collections::BTreeSet;

/// Builder for constructing ReportReadModel from an AnalysisResponse
pub struct ReportReadModelBuilder;

impl ReportReadModelBuilder {
    pub fn build(response: &AnalysisResponse) -> ReportReadModel {
        ReportReadModel {
            metadata: Self::build_metadata(&response.metadata),
            release_units: Self::build_release_units(
                &response.release_graph,
                &response.build_order,
                &response.cycles,
            ),
            cycles: Self::build_cycles(&response.cycles),
            manifest: Self::build_manifest(&response.deduplicated),
            summary: Self::build_summary(&response.summary),
        }
    }

    fn build_metadata(metadata: &ReportMetadata) -> ReportMetadataView {
        ReportMetadataView {
            timestamp: metadata.timestamp().to_string(),
            tool_name: metadata.tool_name().to_string(),
            tool_version: metadata.tool_version().to_string(),
            run_id: metadata.run_id().to_string(),
        }
    }

    /// Lists release units in build order
    fn build_release_units(
        graph: &ReleaseGraph,
        build_order: &[ReleaseNodeId],
        cycles: &[CircularDependencyChain],
    ) -> Vec<ReleaseUnitView> {
        let in_cycle: BTreeSet<ReleaseNodeId> = CycleDetector::members(graph, cycles);

        build_order
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let node = graph.node(*id);
                ReleaseUnitView {
                    position: index + 1,
                    revision: node.revision().to_string(),
                    origin: node.revision().origin().to_string(),
                    tag: node.revision().value().to_string(),
                    members: node.members().keys().map(|k| k.locator()).collect(),
                    depends_on: node
                        .dependencies()
                        .iter()
                        .map(|dep| graph.node(*dep).revision().to_string())
                        .collect(),
                    in_cycle: in_cycle.contains(id),
                }
            })
            .collect()
    }

    fn build_cycles(cycles: &[CircularDependencyChain]) -> Vec<CycleView> {
        cycles
            .iter()
            .map(|cycle| CycleView {
                chain: cycle.revisions().iter().map(|r| r.to_string()).collect(),
            })
            .collect()
    }

    fn build_manifest(forest: &DeduplicatedForest) -> ManifestView {
        ManifestView {
            roots: forest.roots().iter().map(|id| id.to_string()).collect(),
            entries: forest
                .entries()
                .iter()
                .map(|entry| ManifestEntryView {
                    canonical_id: entry.canonical_id.to_string(),
                    locator: entry.key.locator(),
                    revision: entry.revision.as_ref().map(|r| r.to_string()),
                    repository: entry.repository.clone(),
                    dependencies: entry.dependencies.iter().map(|d| d.to_string()).collect(),
                })
                .collect(),
        }
    }

    fn build_summary(summary: &RunSummary) -> SummaryView {
        SummaryView {
            components: summary.components,
            processed: summary.processed,
            skipped: summary
                .skipped
                .iter()
                .map(|s| SkippedView {
                    component: s.component.locator(),
                    reason: s.reason.clone(),
                })
                .collect(),
            failed: summary
                .failed
                .iter()
                .map(|f| FailureView {
                    component: f.component.locator(),
                    reason: f.reason.clone(),
                })
                .collect(),
            release_units: summary.release_units,
            cycles: summary.cycles,
            cycle_policy: summary.cycle_policy.to_string(),
            occurrences: summary.occurrences,
            unique_entries: summary.unique_entries,
            fatal: summary.is_fatal(),
        }
    }
}
