use super::ReleaseRevision;
use crate::shared::Result;
use serde::Serialize;
use std::collections::BTreeSet;

/// A loop in the release graph
///
/// The chain starts and ends with the same revision (`a -> b -> a`). Two chains
/// describing the same loop from different entry points share a dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircularDependencyChain {
    revisions: Vec<ReleaseRevision>,
}

impl CircularDependencyChain {
    /// # Errors
    /// Returns an error if the chain has fewer than two distinct revisions or
    /// does not end where it starts.
    pub fn new(revisions: Vec<ReleaseRevision>) -> Result<Self> {
        let distinct: BTreeSet<&ReleaseRevision> = revisions.iter().collect();
        if distinct.len() < 2 {
            anyhow::bail!(
                "A circular dependency chain needs at least two releases, got {}",
                distinct.len()
            );
        }
        if revisions.first() != revisions.last() {
            anyhow::bail!("A circular dependency chain must end where it starts");
        }
        Ok(Self { revisions })
    }

    /// The loop as walked, first revision repeated at the end
    pub fn revisions(&self) -> &[ReleaseRevision] {
        &self.revisions
    }

    /// Unordered set of revisions in the loop
    pub fn members(&self) -> BTreeSet<ReleaseRevision> {
        self.revisions.iter().cloned().collect()
    }

    /// Stable key identifying the loop independently of its entry point
    pub fn dedup_key(&self) -> BTreeSet<ReleaseRevision> {
        self.members()
    }
}

impl std::fmt::Display for CircularDependencyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.revisions.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(" -> "))
    }
}
