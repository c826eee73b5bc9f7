use crate::release_analysis::domain::{ComponentRecord, ReleaseRevision};
use crate::shared::Result;
use async_trait::async_trait;

/// ReleaseIdResolver port mapping a component to the revision it was built from
///
/// Implementations are pluggable per ecosystem; project-specific tag naming
/// heuristics live in the implementation, never in the graph or dedup logic.
///
/// # Async Support
/// Resolution may consult remote source control, so the method is async and
/// implementations must be `Send + Sync` for concurrent use.
#[async_trait]
pub trait ReleaseIdResolver: Send + Sync {
    /// Resolves the release revision of one component
    ///
    /// # Errors
    /// Returns an error if no revision can be determined. Whether that aborts
    /// the run is decided by the caller's resolution policy.
    async fn resolve(&self, component: &ComponentRecord) -> Result<ReleaseRevision>;
}
