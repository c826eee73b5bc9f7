use async_trait::async_trait;
use release_forest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mock ReleaseIdResolver reading the declared scm block
///
/// Each resolution sleeps for a delay derived from the component name so
/// that concurrent resolutions complete out of submission order.
#[derive(Clone, Default)]
pub struct MockReleaseIdResolver {
    calls: Arc<AtomicUsize>,
    jitter: bool,
}

impl MockReleaseIdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jitter() -> Self {
        Self {
            jitter: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReleaseIdResolver for MockReleaseIdResolver {
    async fn resolve(&self, component: &ComponentRecord) -> Result<ReleaseRevision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.jitter {
            let delay = component.key.name().bytes().map(u64::from).sum::<u64>() % 7;
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        match (&component.scm.origin, &component.scm.tag) {
            (Some(origin), Some(tag)) => ReleaseRevision::new(origin.clone(), tag.clone()),
            _ => anyhow::bail!("mock resolver: nothing declared for {}", component.key),
        }
    }
}
