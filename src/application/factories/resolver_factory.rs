use crate::adapters::outbound::resolvers::{
    CachingReleaseIdResolver, DeclaredScmResolver, ReleaseRule, ResolverChain, RuleBasedResolver,
};
use crate::shared::Result;

/// Factory assembling the release-id resolver used by the CLI
///
/// Declared scm blocks are tried first, then the configured release rules.
/// The whole chain is cached per component.
pub struct ResolverFactory;

impl ResolverFactory {
    /// # Errors
    /// Returns an error if a release rule is invalid
    pub fn create(rules: Vec<ReleaseRule>) -> Result<CachingReleaseIdResolver<ResolverChain>> {
        let mut chain = ResolverChain::new().with(DeclaredScmResolver::new());

        let rule_resolver = RuleBasedResolver::new(rules)?;
        if !rule_resolver.is_empty() {
            chain = chain.with(rule_resolver);
        }

        Ok(CachingReleaseIdResolver::new(chain))
    }

    /// Progress message describing the assembled chain
    pub fn progress_message(rule_count: usize) -> String {
        if rule_count == 0 {
            "🔗 Resolving releases from declared scm information".to_string()
        } else {
            format!(
                "🔗 Resolving releases from declared scm information, then {} release rule(s)",
                rule_count
            )
        }
    }
}
