use super::ComponentKey;
use serde::Serialize;

/// Stable identity of a deduplicated occurrence
///
/// Either the plain package locator (`group:name:version`) or the locator
/// followed by `#<ordinal>` when the component has several structural variations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn plain(key: &ComponentKey) -> Self {
        Self(key.locator())
    }

    /// Locator suffixed with a 1-based variation ordinal
    pub fn with_ordinal(key: &ComponentKey, ordinal: usize) -> Self {
        Self(format!("{}#{}", key.locator(), ordinal))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
