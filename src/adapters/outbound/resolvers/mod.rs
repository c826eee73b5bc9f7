/// Release-id resolver adapters
///
/// Resolvers turn a component into the revision it was released from.
/// They compose: rule and declared-SCM resolvers are chained, and the chain
/// is wrapped in a cache.
mod caching_resolver;
mod declared_scm_resolver;
mod resolver_chain;
mod rule_based_resolver;

pub use caching_resolver::CachingReleaseIdResolver;
pub use declared_scm_resolver::DeclaredScmResolver;
pub use resolver_chain::ResolverChain;
pub use rule_based_resolver::{ReleaseRule, RuleBasedResolver};
