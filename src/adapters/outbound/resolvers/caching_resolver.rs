use crate::ports::outbound::ReleaseIdResolver;
use crate::release_analysis::domain::{ComponentKey, ComponentRecord, ReleaseRevision};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingReleaseIdResolver wraps a ReleaseIdResolver and adds in-memory caching.
///
/// Decorator over any resolver; the cache is keyed by ComponentKey and safe
/// for concurrent access. Failures are not cached.
pub struct CachingReleaseIdResolver<R: ReleaseIdResolver> {
    inner: R,
    cache: Arc<DashMap<ComponentKey, ReleaseRevision>>,
}

impl<R: ReleaseIdResolver> CachingReleaseIdResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// Returns the current cache size (for testing/monitoring)
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: ReleaseIdResolver> ReleaseIdResolver for CachingReleaseIdResolver<R> {
    async fn resolve(&self, component: &ComponentRecord) -> Result<ReleaseRevision> {
        if let Some(cached) = self.cache.get(&component.key) {
            return Ok(cached.clone());
        }

        let revision = self.inner.resolve(component).await?;
        self.cache.insert(component.key.clone(), revision.clone());
        Ok(revision)
    }
}
