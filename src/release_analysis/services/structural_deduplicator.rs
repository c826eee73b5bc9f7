use super::parallel_tree_processor::{NodeContext, NodeOutcome, ParallelTreeProcessor};
use crate::release_analysis::domain::{
    CanonicalId, ComponentKey, DeduplicatedForest, Forest, ManifestEntry, OccurrenceId,
    VariationId,
};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Position in the sequential walk: (root index, post-order index inside the root)
type WalkPosition = (usize, usize);

/// One structurally distinct shape of a component
#[derive(Debug, Clone)]
struct Variation {
    id: VariationId,
    key: ComponentKey,
    /// Child key -> child variation; equal signatures mean equal subtrees
    signature: BTreeMap<ComponentKey, VariationId>,
    first_seen: WalkPosition,
}

/// Registered variations per component key
#[derive(Debug, Default)]
struct VariationRegistry {
    occurrence_counts: HashMap<ComponentKey, usize>,
    by_key: DashMap<ComponentKey, Vec<Variation>>,
    next_id: AtomicUsize,
}

impl VariationRegistry {
    fn index(forest: &Forest) -> Self {
        let mut occurrence_counts: HashMap<ComponentKey, usize> = HashMap::new();
        for occurrence in forest.iter() {
            *occurrence_counts.entry(occurrence.key().clone()).or_insert(0) += 1;
        }
        Self {
            occurrence_counts,
            ..Self::default()
        }
    }

    /// Finalizes one occurrence whose children are all finalized
    fn resolve(
        &self,
        forest: &Forest,
        id: OccurrenceId,
        position: WalkPosition,
        context: &NodeContext<OccurrenceId, VariationId>,
    ) -> Result<VariationId> {
        let occurrence = &forest[id];

        if let Some((child, outcome)) = context.first_unsuccessful_dependency() {
            return Err(AnalysisError::invariant(format!(
                "{} was reached before its child {} was finalized ({})",
                occurrence.key(),
                forest[child].key(),
                outcome.reason().unwrap_or("unknown")
            ))
            .into());
        }

        let mut signature = BTreeMap::new();
        for (child_key, child_id) in occurrence.children() {
            let variation = forest[*child_id].variation().ok_or_else(|| {
                AnalysisError::invariant(format!(
                    "child {} of {} carries no variation",
                    child_key,
                    occurrence.key()
                ))
            })?;
            signature.insert(child_key.clone(), variation);
        }

        let repeated = self
            .occurrence_counts
            .get(occurrence.key())
            .is_some_and(|count| *count > 1);

        // The entry guard serializes every decision about this key.
        let mut variations = self.by_key.entry(occurrence.key().clone()).or_default();

        if repeated {
            for variation in variations.iter_mut() {
                if &variation.key != occurrence.key() {
                    return Err(AnalysisError::invariant(format!(
                        "compared {} against a variation of {}",
                        occurrence.key(),
                        variation.key
                    ))
                    .into());
                }
                if variation.signature.len() == signature.len() && variation.signature == signature
                {
                    if position < variation.first_seen {
                        variation.first_seen = position;
                    }
                    occurrence.assign_variation(variation.id)?;
                    return Ok(variation.id);
                }
            }
        }

        let variation_id = VariationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        variations.push(Variation {
            id: variation_id,
            key: occurrence.key().clone(),
            signature,
            first_seen: position,
        });
        occurrence.assign_variation(variation_id)?;
        Ok(variation_id)
    }

    /// Canonical id of every variation
    ///
    /// A key with one variation keeps its plain locator; otherwise variations
    /// are numbered from 1 in the order they were first finalized.
    fn names(&self) -> HashMap<VariationId, CanonicalId> {
        let mut names = HashMap::new();
        for entry in self.by_key.iter() {
            let mut variations: Vec<&Variation> = entry.value().iter().collect();
            variations.sort_by_key(|v| v.first_seen);

            if variations.len() == 1 {
                names.insert(variations[0].id, CanonicalId::plain(entry.key()));
                continue;
            }
            for (ordinal, variation) in variations.iter().enumerate() {
                names.insert(
                    variation.id,
                    CanonicalId::with_ordinal(entry.key(), ordinal + 1),
                );
            }
        }
        names
    }
}

/// StructuralDeduplicator service collapsing structurally identical occurrences
///
/// Runs one [`ParallelTreeProcessor`] pass per forest root, roots strictly one
/// after another, so a variation is only ever matched once it is final. Inside
/// a root the subtrees are resolved concurrently. Canonical ids are written
/// after the last root, then roots sharing a canonical id are merged.
pub struct StructuralDeduplicator;

impl StructuralDeduplicator {
    pub async fn deduplicate(forest: Arc<Forest>) -> Result<DeduplicatedForest> {
        Self::deduplicate_with_progress(forest, |_, _| {}).await
    }

    /// Same as [`deduplicate`](Self::deduplicate), calling `on_root(done, total)` after each root
    ///
    /// # Errors
    /// Returns a `Validation` error if the forest already carries identities,
    /// and an `InvariantViolation` if any occurrence could not be finalized.
    pub async fn deduplicate_with_progress<F>(
        forest: Arc<Forest>,
        mut on_root: F,
    ) -> Result<DeduplicatedForest>
    where
        F: FnMut(usize, usize),
    {
        if forest
            .iter()
            .any(|o| o.variation().is_some() || o.canonical_id().is_some())
        {
            return Err(AnalysisError::Validation {
                message: "forest is already deduplicated; reset its identities first".to_string(),
            }
            .into());
        }

        let registry = Arc::new(VariationRegistry::index(&forest));
        let total = forest.roots().len();

        for (root_index, root) in forest.roots().iter().copied().enumerate() {
            let positions: Arc<HashMap<OccurrenceId, usize>> = Arc::new(
                forest
                    .post_order(root)
                    .into_iter()
                    .enumerate()
                    .map(|(index, id)| (id, index))
                    .collect(),
            );

            let children_forest = Arc::clone(&forest);
            let work_forest = Arc::clone(&forest);
            let work_registry = Arc::clone(&registry);

            let processor: ParallelTreeProcessor<OccurrenceId, OccurrenceId, VariationId> =
                ParallelTreeProcessor::new(
                    |id: &OccurrenceId| *id,
                    move |id: &OccurrenceId| {
                        children_forest[*id]
                            .children()
                            .iter()
                            .map(|(_, child)| *child)
                            .collect()
                    },
                    move |id: &OccurrenceId, context: &NodeContext<OccurrenceId, VariationId>| {
                        let position = (
                            root_index,
                            positions.get(id).copied().unwrap_or(usize::MAX),
                        );
                        match work_registry.resolve(&work_forest, *id, position, context) {
                            Ok(variation) => NodeOutcome::Success(variation),
                            Err(e) => NodeOutcome::Failure(e.to_string()),
                        }
                    },
                );

            let processed = processor.schedule(vec![root])?.join().await;
            if let Some((id, outcome)) = processed.unsuccessful().next() {
                return Err(AnalysisError::invariant(format!(
                    "could not finalize {}: {}",
                    forest[*id].key(),
                    outcome.reason().unwrap_or("unknown")
                ))
                .into());
            }

            on_root(root_index + 1, total);
        }

        let names = registry.names();
        for root in forest.roots() {
            for id in forest.post_order(*root) {
                let occurrence = &forest[id];
                let variation = occurrence.variation().ok_or_else(|| {
                    AnalysisError::invariant(format!("{} was never finalized", occurrence.key()))
                })?;
                let name = names.get(&variation).cloned().ok_or_else(|| {
                    AnalysisError::invariant(format!("{} has an unnamed variation", occurrence.key()))
                })?;
                occurrence.assign_canonical_id(name)?;
            }
        }

        Self::collect(&forest)
    }

    fn collect(forest: &Forest) -> Result<DeduplicatedForest> {
        let canonical = |id: OccurrenceId| -> Result<CanonicalId> {
            forest[id].canonical_id().cloned().ok_or_else(|| {
                AnalysisError::invariant(format!("{} has no canonical id", forest[id].key())).into()
            })
        };

        let mut seen: HashSet<CanonicalId> = HashSet::new();
        let mut entries = Vec::new();
        for occurrence in forest.iter() {
            let canonical_id = canonical(occurrence.id())?;
            if !seen.insert(canonical_id.clone()) {
                continue;
            }
            let dependencies = occurrence
                .children()
                .iter()
                .map(|(_, child)| canonical(*child))
                .collect::<Result<Vec<_>>>()?;
            entries.push(ManifestEntry {
                canonical_id,
                key: occurrence.key().clone(),
                revision: None,
                repository: occurrence.metadata().repository().map(str::to_string),
                dependencies,
            });
        }

        let mut roots: Vec<CanonicalId> = Vec::with_capacity(forest.roots().len());
        for root in forest.roots() {
            let canonical_id = canonical(*root)?;
            if !roots.contains(&canonical_id) {
                roots.push(canonical_id);
            }
        }

        Ok(DeduplicatedForest::new(roots, entries, forest.len()))
    }
}
