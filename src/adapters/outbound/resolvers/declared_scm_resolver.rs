use crate::ports::outbound::ReleaseIdResolver;
use crate::release_analysis::domain::{ComponentRecord, ReleaseRevision};
use crate::shared::Result;
use async_trait::async_trait;

/// DeclaredScmResolver adapter reading the scm block reported by the walker
///
/// A declared tag is required. When no origin is declared the component's
/// group stands in for it, so co-released components of one group still
/// share a release unit.
pub struct DeclaredScmResolver;

impl DeclaredScmResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeclaredScmResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReleaseIdResolver for DeclaredScmResolver {
    async fn resolve(&self, component: &ComponentRecord) -> Result<ReleaseRevision> {
        let tag = match component.scm.tag.as_deref() {
            Some(tag) if !tag.trim().is_empty() => tag,
            _ => anyhow::bail!("no scm tag declared"),
        };
        let origin = component
            .scm
            .origin
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .unwrap_or_else(|| component.key.group());

        ReleaseRevision::new(origin.to_string(), tag.to_string())
    }
}
