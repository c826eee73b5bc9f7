pub mod canonical_id;
pub mod circular_dependency;
pub mod component_key;
pub mod deduplicated_forest;
pub mod occurrence;
pub mod release_graph;
pub mod release_revision;
pub mod report_metadata;

pub use canonical_id::CanonicalId;
pub use circular_dependency::CircularDependencyChain;
pub use component_key::{ComponentKey, ComponentMetadata, ComponentRecord};
pub use deduplicated_forest::{DeduplicatedForest, ManifestEntry};
pub use occurrence::{Forest, ForestBuilder, Occurrence, OccurrenceId, VariationId};
pub use release_graph::{ReleaseGraph, ReleaseNode, ReleaseNodeId};
pub use release_revision::{ReleaseRevision, ScmReference};
pub use report_metadata::ReportMetadata;
