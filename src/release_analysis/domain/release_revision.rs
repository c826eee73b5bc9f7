use crate::shared::Result;
use serde::Serialize;

/// ReleaseRevision value object
///
/// Identifies the source-control state a set of co-built components came
/// from. Two components with equal revisions belong to the same release unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReleaseRevision {
    origin: String,
    value: String,
}

impl ReleaseRevision {
    pub fn new(origin: String, value: String) -> Result<Self> {
        if origin.trim().is_empty() {
            anyhow::bail!("Release origin cannot be empty");
        }
        if value.trim().is_empty() {
            anyhow::bail!("Release tag for '{}' cannot be empty", origin);
        }
        Ok(Self { origin, value })
    }

    /// Source-control location (repository URL or name)
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Tag, branch or commit inside the origin
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for ReleaseRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.origin, self.value)
    }
}

/// SCM information declared by the forest walker for one component
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScmReference {
    pub origin: Option<String>,
    pub tag: Option<String>,
}
