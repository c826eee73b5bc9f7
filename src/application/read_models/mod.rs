//! Read models for CQRS-lite pattern
//!
//! View-optimized structs giving formatters a flat, denormalized picture of
//! an analysis run.

mod report_read_model;
mod report_read_model_builder;

pub use report_read_model::{
    CycleView, FailureView, ManifestEntryView, ManifestView, ReleaseUnitView, ReportMetadataView,
    ReportReadModel, SkippedView, SummaryView,
};
pub use report_read_model_builder::ReportReadModelBuilder;
