//! release-forest - release-unit analysis for component dependency forests
//!
//! This library groups the components of a dependency forest into release
//! units, orders those units for building, detects circular release
//! dependencies and deduplicates structurally identical subtrees, following
//! hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`release_analysis`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use release_forest::prelude::*;
//! use std::path::Path;
//!
//! # async fn example() -> Result<()> {
//! // Create adapters
//! let walker = DocumentForestWalker::from_path(Path::new("forest.json"))?;
//! let resolver = CachingReleaseIdResolver::new(DeclaredScmResolver::new());
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = AnalyzeForestUseCase::new(walker, resolver, progress_reporter);
//!
//! // Execute
//! let response = use_case.execute(AnalysisRequest::default()).await?;
//!
//! // Format output
//! let output = JsonFormatter::new().format(&response)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod release_analysis;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        DocumentFormat, DocumentForestWalker, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::resolvers::{
        CachingReleaseIdResolver, DeclaredScmResolver, ReleaseRule, ResolverChain,
        RuleBasedResolver,
    };
    pub use crate::application::dto::{
        AnalysisRequest, AnalysisResponse, OutputFormat, RunSummary, SkippedComponent,
    };
    pub use crate::application::use_cases::{AnalyzeForestUseCase, ForestCollector};
    pub use crate::ports::outbound::{
        ForestVisitor, ForestWalker, OutputPresenter, ProgressReporter, ReleaseIdResolver,
        ReportFormatter, WalkedNode,
    };
    pub use crate::release_analysis::domain::{
        CanonicalId, CircularDependencyChain, ComponentKey, ComponentMetadata, ComponentRecord,
        DeduplicatedForest, Forest, ManifestEntry, ReleaseGraph, ReleaseNode, ReleaseNodeId,
        ReleaseRevision, ScmReference,
    };
    pub use crate::release_analysis::services::{
        CycleDetector, CyclePolicy, ReleaseGraphBuilder, ResolutionFailure, ResolutionPolicy,
        StructuralDeduplicator, TopologicalSorter,
    };
    pub use crate::shared::error::{AnalysisError, ExitCode};
    pub use crate::shared::Result;
}
