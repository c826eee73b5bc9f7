mod component_filter;
mod cycle_detector;
pub mod parallel_tree_processor;
mod release_graph_builder;
mod report_generator;
mod structural_deduplicator;
mod topological_sorter;

pub use component_filter::{ComponentFilter, ExclusionReason};
pub use cycle_detector::{CycleDetector, CyclePolicy};
pub use parallel_tree_processor::{
    NodeContext, NodeOutcome, ParallelTreeProcessor, ProcessedForest, ScheduledForest,
};
pub use release_graph_builder::{
    apply_policy, BuiltReleaseGraph, ReleaseGraphBuilder, ResolutionFailure, ResolutionPolicy,
};
pub use report_generator::ReportGenerator;
pub use structural_deduplicator::StructuralDeduplicator;
pub use topological_sorter::TopologicalSorter;
