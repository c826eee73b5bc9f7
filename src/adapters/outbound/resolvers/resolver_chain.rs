use crate::ports::outbound::ReleaseIdResolver;
use crate::release_analysis::domain::{ComponentRecord, ReleaseRevision};
use crate::shared::Result;
use async_trait::async_trait;

/// ResolverChain adapter trying resolvers in order
///
/// The first resolver that succeeds wins. If all fail, the error lists every
/// resolver's reason in order.
pub struct ResolverChain {
    resolvers: Vec<Box<dyn ReleaseIdResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    pub fn with(mut self, resolver: impl ReleaseIdResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReleaseIdResolver for ResolverChain {
    async fn resolve(&self, component: &ComponentRecord) -> Result<ReleaseRevision> {
        let mut reasons = Vec::with_capacity(self.resolvers.len());
        for resolver in &self.resolvers {
            match resolver.resolve(component).await {
                Ok(revision) => return Ok(revision),
                Err(e) => reasons.push(format!("{:#}", e)),
            }
        }

        if reasons.is_empty() {
            anyhow::bail!("no release resolver configured");
        }
        anyhow::bail!("{}", reasons.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release_analysis::domain::{ComponentKey, ComponentMetadata, ScmReference};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedResolver {
        tag: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ReleaseIdResolver for FixedResolver {
        async fn resolve(&self, _component: &ComponentRecord) -> Result<ReleaseRevision> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.tag {
                Some(tag) => ReleaseRevision::new("acme".to_string(), tag.to_string()),
                None => anyhow::bail!("fixed resolver has no tag"),
            }
        }
    }

    fn fixed(tag: Option<&'static str>) -> (FixedResolver, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            FixedResolver {
                tag,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    fn record() -> ComponentRecord {
        ComponentRecord {
            key: ComponentKey::new("org.acme".to_string(), "core".to_string(), "1.0".to_string())
                .unwrap(),
            metadata: ComponentMetadata::default(),
            scm: ScmReference::default(),
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let (failing, failing_calls) = fixed(None);
        let (first, _) = fixed(Some("first"));
        let (second, second_calls) = fixed(Some("second"));
        let chain = ResolverChain::new().with(failing).with(first).with(second);

        let revision = chain.resolve(&record()).await.unwrap();

        assert_eq!(revision.value(), "first");
        assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(chain.len(), 3);
    }

    #[tokio::test]
    async fn test_all_failures_are_reported() {
        let (a, _) = fixed(None);
        let (b, _) = fixed(None);
        let chain = ResolverChain::new().with(a).with(b);

        let message = chain.resolve(&record()).await.unwrap_err().to_string();
        assert_eq!(message, "fixed resolver has no tag; fixed resolver has no tag");
    }

    #[tokio::test]
    async fn test_empty_chain_fails() {
        let chain = ResolverChain::default();
        assert!(chain.is_empty());
        assert!(chain.resolve(&record()).await.is_err());
    }
}
