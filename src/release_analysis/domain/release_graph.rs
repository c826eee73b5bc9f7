use super::{ComponentKey, ComponentMetadata, ReleaseRevision};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Arena index of a release node inside its [`ReleaseGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReleaseNodeId(usize);

impl ReleaseNodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A release unit: every component built from one source-control revision
///
/// `dependencies` are the forward edges; `dependants` mirror them and are only
/// used for lookups such as root detection.
#[derive(Debug, Clone)]
pub struct ReleaseNode {
    id: ReleaseNodeId,
    revision: ReleaseRevision,
    members: BTreeMap<ComponentKey, ComponentMetadata>,
    dependants: BTreeSet<ReleaseNodeId>,
    dependencies: BTreeSet<ReleaseNodeId>,
}

impl ReleaseNode {
    pub fn id(&self) -> ReleaseNodeId {
        self.id
    }

    pub fn revision(&self) -> &ReleaseRevision {
        &self.revision
    }

    pub fn members(&self) -> &BTreeMap<ComponentKey, ComponentMetadata> {
        &self.members
    }

    pub fn dependants(&self) -> &BTreeSet<ReleaseNodeId> {
        &self.dependants
    }

    pub fn dependencies(&self) -> &BTreeSet<ReleaseNodeId> {
        &self.dependencies
    }

    pub fn is_root(&self) -> bool {
        self.dependants.is_empty()
    }
}

/// ReleaseGraph aggregate: release units and the dependency edges between them
#[derive(Debug, Clone, Default)]
pub struct ReleaseGraph {
    nodes: Vec<ReleaseNode>,
    index: HashMap<ReleaseRevision, ReleaseNodeId>,
    component_index: HashMap<ComponentKey, ReleaseNodeId>,
}

impl ReleaseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `revision`, creating it on first sighting
    pub fn get_or_create(&mut self, revision: &ReleaseRevision) -> ReleaseNodeId {
        if let Some(id) = self.index.get(revision) {
            return *id;
        }
        let id = ReleaseNodeId(self.nodes.len());
        self.nodes.push(ReleaseNode {
            id,
            revision: revision.clone(),
            members: BTreeMap::new(),
            dependants: BTreeSet::new(),
            dependencies: BTreeSet::new(),
        });
        self.index.insert(revision.clone(), id);
        id
    }

    /// Adds a component to a release unit
    ///
    /// A component belongs to exactly one release; adding it again moves it.
    pub fn add_member(&mut self, id: ReleaseNodeId, key: ComponentKey, metadata: ComponentMetadata) {
        if let Some(previous) = self.component_index.insert(key.clone(), id) {
            if previous != id {
                self.nodes[previous.0].members.remove(&key);
            }
        }
        self.nodes[id.0].members.insert(key, metadata);
    }

    /// Removes a component from whichever release unit holds it
    pub fn remove_member(&mut self, key: &ComponentKey) -> bool {
        match self.component_index.remove(key) {
            Some(id) => self.nodes[id.0].members.remove(key).is_some(),
            None => false,
        }
    }

    /// Release unit a component was assigned to
    pub fn release_of(&self, key: &ComponentKey) -> Option<&ReleaseNode> {
        self.component_index.get(key).map(|id| &self.nodes[id.0])
    }

    /// Adds `from -> to` and the mirrored dependant edge
    ///
    /// Self edges are ignored. Returns true if the edge was new.
    pub fn add_dependency(&mut self, from: ReleaseNodeId, to: ReleaseNodeId) -> bool {
        if from == to {
            return false;
        }
        let inserted = self.nodes[from.0].dependencies.insert(to);
        self.nodes[to.0].dependants.insert(from);
        inserted
    }

    /// Drops nodes without members and renumbers the remaining ones
    ///
    /// Returns the number of nodes removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.nodes.len();
        let mut remap: HashMap<ReleaseNodeId, ReleaseNodeId> = HashMap::new();
        let mut kept = Vec::with_capacity(before);

        for node in self.nodes.drain(..) {
            if node.members.is_empty() {
                continue;
            }
            remap.insert(node.id, ReleaseNodeId(kept.len()));
            kept.push(node);
        }

        for node in &mut kept {
            node.id = remap[&node.id];
            node.dependencies = node
                .dependencies
                .iter()
                .filter_map(|id| remap.get(id).copied())
                .collect();
            node.dependants = node
                .dependants
                .iter()
                .filter_map(|id| remap.get(id).copied())
                .collect();
        }

        self.index = kept.iter().map(|n| (n.revision.clone(), n.id)).collect();
        self.component_index = kept
            .iter()
            .flat_map(|n| n.members.keys().map(move |k| (k.clone(), n.id)))
            .collect();
        self.nodes = kept;
        before - self.nodes.len()
    }

    pub fn node(&self, id: ReleaseNodeId) -> &ReleaseNode {
        &self.nodes[id.0]
    }

    pub fn find(&self, revision: &ReleaseRevision) -> Option<&ReleaseNode> {
        self.index.get(revision).map(|id| &self.nodes[id.0])
    }

    /// Nodes in creation order
    pub fn nodes(&self) -> &[ReleaseNode] {
        &self.nodes
    }

    /// Nodes nothing else depends on, in creation order
    pub fn roots(&self) -> impl Iterator<Item = &ReleaseNode> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.dependencies.len()).sum()
    }
}
