mod forest_collector;

pub use forest_collector::{CollectedForest, ForestCollector};

use crate::application::dto::{AnalysisRequest, AnalysisResponse, RunSummary, SkippedComponent};
use crate::ports::outbound::{ForestWalker, ProgressReporter, ReleaseIdResolver};
use crate::release_analysis::domain::{
    CircularDependencyChain, ComponentRecord, DeduplicatedForest, Forest, ReleaseGraph,
};
use crate::release_analysis::services::{
    apply_policy, BuiltReleaseGraph, ComponentFilter, CycleDetector, CyclePolicy,
    ReleaseGraphBuilder, ReportGenerator, ResolutionFailure, ResolutionPolicy,
    StructuralDeduplicator, TopologicalSorter,
};
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Maximum number of release-id resolutions in flight at once
const MAX_CONCURRENT_RESOLUTIONS: usize = 16;

/// AnalyzeForestUseCase - walks a dependency forest and analyses its releases
///
/// Orchestrates release grouping, cycle detection, build ordering and
/// structural deduplication using generic dependency injection for every
/// infrastructure collaborator.
///
/// # Type Parameters
/// * `W` - ForestWalker implementation
/// * `R` - ReleaseIdResolver implementation
/// * `P` - ProgressReporter implementation
pub struct AnalyzeForestUseCase<W, R, P> {
    walker: W,
    resolver: R,
    progress_reporter: P,
}

impl<W, R, P> AnalyzeForestUseCase<W, R, P>
where
    W: ForestWalker,
    R: ReleaseIdResolver,
    P: ProgressReporter,
{
    pub fn new(walker: W, resolver: R, progress_reporter: P) -> Self {
        Self {
            walker,
            resolver,
            progress_reporter,
        }
    }

    /// Executes the analysis
    ///
    /// Cycles never abort the run here; the response carries them and
    /// [`AnalysisResponse::cycle_error`] tells consumers whether to fail.
    ///
    /// # Errors
    /// Returns an error if the walk fails, if a release cannot be resolved
    /// under [`ResolutionPolicy::AbortOnFirstFailure`], or on an internal
    /// invariant violation.
    pub async fn execute(&self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        // Step 1: Walk the forest
        let collected = self.collect_forest()?;
        let component_count = collected.components.len();

        // Step 2: Apply exclusion filters
        let (included, skipped) = self.apply_filters(collected.components, &request)?;

        // Step 3: Resolve release revisions and group components
        let builder = self
            .resolve_releases(included, request.resolution_policy)
            .await?;
        let processed = builder.component_count();

        // Step 4: Wire the release graph
        let built = builder.build(&collected.edges);
        self.report_graph(&built);

        // Step 5: Detect cycles and compute the build order
        let cycles = self.detect_cycles(&built.graph, request.cycle_policy)?;
        let build_order = TopologicalSorter::sort(&built.graph);

        // Step 6: Deduplicate the occurrence forest
        let mut deduplicated = self.deduplicate(collected.forest).await?;
        deduplicated.attach_revisions(|key| {
            built
                .graph
                .release_of(key)
                .map(|node| node.revision().clone())
        });

        let summary = RunSummary {
            components: component_count,
            processed,
            skipped,
            failed: built.failures,
            release_units: built.graph.len(),
            cycles: cycles.len(),
            occurrences: deduplicated.visited_occurrences(),
            unique_entries: deduplicated.unique_count(),
            cycle_policy: request.cycle_policy,
        };
        self.report_summary(&summary);

        Ok(AnalysisResponse::new(
            ReportGenerator::generate_default_metadata(),
            built.graph,
            build_order,
            cycles,
            deduplicated,
            summary,
        ))
    }

    fn collect_forest(&self) -> Result<CollectedForest> {
        self.progress_reporter
            .report("📖 Walking dependency forest...");

        let mut collector = ForestCollector::new();
        self.walker.walk(&mut collector)?;
        let collected = collector.finish()?;

        self.progress_reporter.report(&format!(
            "✅ Detected {} component(s) in {} occurrence(s) under {} root(s)",
            collected.components.len(),
            collected.forest.len(),
            collected.forest.roots().len()
        ));
        Ok(collected)
    }

    /// Splits components into included ones and skipped ones with reasons
    ///
    /// # Errors
    /// Returns an error for invalid patterns or if every component was excluded
    fn apply_filters(
        &self,
        components: Vec<ComponentRecord>,
        request: &AnalysisRequest,
    ) -> Result<(Vec<ComponentRecord>, Vec<SkippedComponent>)> {
        let filter = ComponentFilter::new(request.exclude_patterns.clone(), request.include_unmanaged)?;
        let original_count = components.len();

        let mut included = Vec::with_capacity(original_count);
        let mut skipped = Vec::new();
        for record in components {
            match filter.exclusion(&record.key, &record.metadata) {
                Some(reason) => skipped.push(SkippedComponent {
                    component: record.key,
                    reason: reason.to_string(),
                }),
                None => included.push(record),
            }
        }

        if !skipped.is_empty() {
            self.progress_reporter.report(&format!(
                "🚫 Excluded {} component(s) from release grouping",
                skipped.len()
            ));
        }

        if included.is_empty() && original_count > 0 {
            anyhow::bail!(
                "All {} component(s) were excluded from release grouping. \
                 Please adjust your exclusion patterns or use --include-unmanaged.",
                original_count
            );
        }

        for pattern in filter.unmatched_patterns() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Exclude pattern '{}' did not match any component.",
                pattern
            ));
        }

        Ok((included, skipped))
    }

    /// Resolves every component through the resolver port
    ///
    /// Resolutions run concurrently but results are consumed in component
    /// order, so the graph is built identically on every run.
    async fn resolve_releases(
        &self,
        components: Vec<ComponentRecord>,
        policy: ResolutionPolicy,
    ) -> Result<ReleaseGraphBuilder> {
        self.progress_reporter
            .report("🔍 Resolving release revisions...");

        let total = components.len();
        let resolver = &self.resolver;
        let mut results = stream::iter(components.into_iter().map(|record| async move {
            let resolved = resolver.resolve(&record).await;
            (record, resolved)
        }))
        .buffered(MAX_CONCURRENT_RESOLUTIONS);

        let mut builder = ReleaseGraphBuilder::new();
        let mut done = 0;
        while let Some((record, resolved)) = results.next().await {
            done += 1;
            self.progress_reporter
                .report_progress(done, total, Some(record.key.locator().as_str()));

            match resolved {
                Ok(revision) => {
                    builder.add_component(record.key, record.metadata, &revision);
                }
                Err(e) => {
                    let failure = ResolutionFailure::new(record.key, format!("{:#}", e));
                    if policy == ResolutionPolicy::CollectAndContinue {
                        self.progress_reporter.report_error(&format!(
                            "⚠️  Warning: Skipping {}: {}",
                            failure.component, failure.reason
                        ));
                    }
                    apply_policy(&mut builder, policy, failure)?;
                }
            }
        }

        Ok(builder)
    }

    fn report_graph(&self, built: &BuiltReleaseGraph) {
        self.progress_reporter.report(&format!(
            "📊 Grouped into {} release unit(s) with {} dependency edge(s)",
            built.graph.len(),
            built.graph.edge_count()
        ));
        if built.pruned_nodes > 0 {
            self.progress_reporter.report(&format!(
                "   - Dropped {} release unit(s) left empty after filtering",
                built.pruned_nodes
            ));
        }
        if built.intra_release_edges > 0 {
            self.progress_reporter.report(&format!(
                "   - Ignored {} edge(s) between co-released components",
                built.intra_release_edges
            ));
        }
    }

    fn detect_cycles(
        &self,
        graph: &ReleaseGraph,
        policy: CyclePolicy,
    ) -> Result<Vec<CircularDependencyChain>> {
        let cycles = CycleDetector::detect(graph)?;
        if cycles.is_empty() {
            return Ok(cycles);
        }

        let label = match policy {
            CyclePolicy::Warn => "⚠️  Warning",
            CyclePolicy::Fail => "❌ Error",
        };
        for cycle in &cycles {
            self.progress_reporter.report_error(&format!(
                "{}: circular release dependency {}",
                label, cycle
            ));
        }
        Ok(cycles)
    }

    async fn deduplicate(&self, forest: Forest) -> Result<DeduplicatedForest> {
        self.progress_reporter
            .report("🧬 Deduplicating structurally identical occurrences...");

        let forest = Arc::new(forest);
        let deduplicated = StructuralDeduplicator::deduplicate_with_progress(
            Arc::clone(&forest),
            |done, total| {
                self.progress_reporter
                    .report_progress(done, total, Some("roots deduplicated"))
            },
        )
        .await?;

        self.progress_reporter.report(&format!(
            "✅ {} unique entr(ies) from {} occurrence(s)",
            deduplicated.unique_count(),
            deduplicated.visited_occurrences()
        ));
        Ok(deduplicated)
    }

    fn report_summary(&self, summary: &RunSummary) {
        self.progress_reporter.report_completion(&format!(
            "Processed {} of {} component(s): {} skipped, {} failed, {} cycle(s)",
            summary.processed,
            summary.components,
            summary.skipped.len(),
            summary.failed.len(),
            summary.cycles
        ));
        for failure in &summary.failed {
            self.progress_reporter.report_error(&format!(
                "   - failed: {} ({})",
                failure.component, failure.reason
            ));
        }
    }
}
