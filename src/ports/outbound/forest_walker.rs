use crate::release_analysis::domain::{ComponentKey, ComponentMetadata, ScmReference};
use crate::shared::Result;

/// What the walker exposes about the node it is currently visiting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedNode {
    pub key: ComponentKey,
    pub metadata: ComponentMetadata,
    pub scm: ScmReference,
}

/// Receives the depth-first enter/leave event stream of a forest walk
///
/// For every node `enter` is called before any event of its children and
/// `leave` after all of them.
pub trait ForestVisitor {
    fn enter(&mut self, node: &WalkedNode) -> Result<()>;

    fn leave(&mut self, node: &WalkedNode) -> Result<()>;
}

/// ForestWalker port for the dependency-forest collaborator
///
/// Deciding which components exist and what their transitive dependencies
/// are happens behind this port. Roots are walked one after another in a
/// stable order.
pub trait ForestWalker {
    /// Walks every root, forwarding events to `visitor`
    ///
    /// # Errors
    /// Returns an error if the underlying source cannot be read or if the
    /// visitor rejects an event; the walk stops at the first error.
    fn walk(&self, visitor: &mut dyn ForestVisitor) -> Result<()>;
}
