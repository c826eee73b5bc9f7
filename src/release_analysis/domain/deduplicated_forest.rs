use super::{CanonicalId, ComponentKey, ReleaseRevision};
use serde::Serialize;

/// One unique, deduplicated component entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub canonical_id: CanonicalId,
    pub key: ComponentKey,
    /// Release the component was resolved to; `None` when it was filtered out
    /// or could not be resolved
    pub revision: Option<ReleaseRevision>,
    pub repository: Option<String>,
    pub dependencies: Vec<CanonicalId>,
}

/// Result of structural deduplication over a whole forest
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeduplicatedForest {
    roots: Vec<CanonicalId>,
    entries: Vec<ManifestEntry>,
    visited_occurrences: usize,
}

impl DeduplicatedForest {
    pub fn new(
        roots: Vec<CanonicalId>,
        entries: Vec<ManifestEntry>,
        visited_occurrences: usize,
    ) -> Self {
        Self {
            roots,
            entries,
            visited_occurrences,
        }
    }

    /// Top-level entries after root merging
    pub fn roots(&self) -> &[CanonicalId] {
        &self.roots
    }

    /// Unique entries in first-appearance order
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &CanonicalId) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| &e.canonical_id == id)
    }

    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of occurrences the walker produced before deduplication
    pub fn visited_occurrences(&self) -> usize {
        self.visited_occurrences
    }

    /// Stamps every entry with the release its key resolved to
    pub fn attach_revisions<F>(&mut self, mut revision_of: F)
    where
        F: FnMut(&ComponentKey) -> Option<ReleaseRevision>,
    {
        for entry in &mut self.entries {
            entry.revision = revision_of(&entry.key);
        }
    }
}
