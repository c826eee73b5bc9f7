use crate::shared::error::AnalysisError;
use crate::shared::Result;
use dashmap::DashMap;
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Terminal state of one node's unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome<T> {
    Success(T),
    Failure(String),
    Canceled,
    Skipped(String),
}

impl<T> NodeOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, NodeOutcome::Success(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            NodeOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Human readable reason for a non-successful outcome
    pub fn reason(&self) -> Option<&str> {
        match self {
            NodeOutcome::Success(_) => None,
            NodeOutcome::Failure(reason) | NodeOutcome::Skipped(reason) => Some(reason),
            NodeOutcome::Canceled => Some("canceled"),
        }
    }
}

/// View handed to a unit of work: the outcomes of the node's children and
/// declared dependencies, all of which are terminal when the work runs.
pub struct NodeContext<K, T> {
    dependencies: Vec<K>,
    results: Arc<DashMap<K, NodeOutcome<T>>>,
}

impl<K, T> NodeContext<K, T>
where
    K: Clone + Eq + Hash,
    T: Clone,
{
    /// Identities of the children and extra dependencies, in declaration order
    pub fn dependencies(&self) -> &[K] {
        &self.dependencies
    }

    /// Outcome of any already finished node
    pub fn outcome(&self, key: &K) -> Option<NodeOutcome<T>> {
        self.results.get(key).map(|entry| entry.value().clone())
    }

    pub fn dependency_outcomes(&self) -> Vec<(K, NodeOutcome<T>)> {
        self.dependencies
            .iter()
            .map(|key| {
                let outcome = self.outcome(key).unwrap_or(NodeOutcome::Canceled);
                (key.clone(), outcome)
            })
            .collect()
    }

    /// First child or dependency that did not succeed
    pub fn first_unsuccessful_dependency(&self) -> Option<(K, NodeOutcome<T>)> {
        self.dependency_outcomes()
            .into_iter()
            .find(|(_, outcome)| !outcome.is_success())
    }
}

type IdentityFn<N, K> = Arc<dyn Fn(&N) -> K + Send + Sync>;
type ChildrenFn<N> = Arc<dyn Fn(&N) -> Vec<N> + Send + Sync>;
type WorkFn<N, K, T> = Arc<dyn Fn(&N, &NodeContext<K, T>) -> NodeOutcome<T> + Send + Sync>;
type CompletionHandle = Shared<BoxFuture<'static, ()>>;

/// Generic bottom-up evaluator over one or more trees
///
/// Every node becomes a task on the tokio worker pool. A task first awaits the
/// tasks of all its children (and extra dependencies), then runs the unit of
/// work exactly once. Independent subtrees and roots run concurrently. A
/// failed child never cancels its ancestors; the unit of work inspects child
/// outcomes through [`NodeContext`] and decides its own fate.
///
/// # Type Parameters
/// * `N` - Node handle passed to the callbacks
/// * `K` - Node identity; a node reachable twice is scheduled once
/// * `T` - Value produced by a successful unit of work
pub struct ParallelTreeProcessor<N, K, T> {
    identity: IdentityFn<N, K>,
    children: ChildrenFn<N>,
    extra_dependencies: Option<ChildrenFn<N>>,
    work: WorkFn<N, K, T>,
}

impl<N, K, T> ParallelTreeProcessor<N, K, T>
where
    N: Clone + Send + Sync + 'static,
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a processor from the three caller-supplied functions
    ///
    /// # Arguments
    /// * `identity` - Maps a node to its identity
    /// * `children` - Lists a node's children
    /// * `work` - Per-node unit of work; runs after every child is terminal
    pub fn new<I, C, W>(identity: I, children: C, work: W) -> Self
    where
        I: Fn(&N) -> K + Send + Sync + 'static,
        C: Fn(&N) -> Vec<N> + Send + Sync + 'static,
        W: Fn(&N, &NodeContext<K, T>) -> NodeOutcome<T> + Send + Sync + 'static,
    {
        Self {
            identity: Arc::new(identity),
            children: Arc::new(children),
            extra_dependencies: None,
            work: Arc::new(work),
        }
    }

    /// Declares extra nodes a node must wait for besides its children
    pub fn with_dependencies<D>(mut self, dependencies: D) -> Self
    where
        D: Fn(&N) -> Vec<N> + Send + Sync + 'static,
    {
        self.extra_dependencies = Some(Arc::new(dependencies));
        self
    }

    /// Spawns the task graph for every node reachable from `roots`
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns an `InvariantViolation` if no runtime is available or if the
    /// declared dependencies form a loop (which would never finish).
    pub fn schedule(&self, roots: Vec<N>) -> Result<ScheduledForest<K, T>> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(AnalysisError::invariant(
                "the parallel tree processor must be scheduled inside a tokio runtime",
            )
            .into());
        }

        let results: Arc<DashMap<K, NodeOutcome<T>>> = Arc::new(DashMap::new());
        let mut handles: HashMap<K, CompletionHandle> = HashMap::new();
        let mut order: Vec<K> = Vec::new();
        let mut on_path: HashSet<K> = HashSet::new();

        for root in roots {
            let mut stack = vec![Frame::Enter(root)];

            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Enter(node) => {
                        let key = (self.identity)(&node);
                        if handles.contains_key(&key) {
                            continue;
                        }
                        if !on_path.insert(key.clone()) {
                            return Err(AnalysisError::invariant(format!(
                                "dependency loop while scheduling node {:?}",
                                key
                            ))
                            .into());
                        }

                        let mut dependencies = (self.children)(&node);
                        if let Some(extra) = &self.extra_dependencies {
                            dependencies.extend(extra(&node));
                        }

                        let pending: Vec<Frame<N, K>> =
                            dependencies.iter().cloned().map(Frame::Enter).collect();
                        stack.push(Frame::Exit(node, key, dependencies));
                        stack.extend(pending.into_iter().rev());
                    }
                    Frame::Exit(node, key, dependencies) => {
                        on_path.remove(&key);

                        let mut dependency_keys: Vec<K> = Vec::with_capacity(dependencies.len());
                        for dependency in &dependencies {
                            let dependency_key = (self.identity)(dependency);
                            if !dependency_keys.contains(&dependency_key) {
                                dependency_keys.push(dependency_key);
                            }
                        }

                        let mut waits = Vec::with_capacity(dependency_keys.len());
                        for dependency_key in &dependency_keys {
                            let handle = handles.get(dependency_key).ok_or_else(|| {
                                AnalysisError::invariant(format!(
                                    "node {:?} was not scheduled before its dependant {:?}",
                                    dependency_key, key
                                ))
                            })?;
                            waits.push(handle.clone());
                        }

                        let handle = self.spawn_node(node, key.clone(), dependency_keys, waits, &results);
                        handles.insert(key.clone(), handle);
                        order.push(key);
                    }
                }
            }
        }

        Ok(ScheduledForest {
            order,
            handles: handles.into_values().collect(),
            results,
        })
    }

    fn spawn_node(
        &self,
        node: N,
        key: K,
        dependencies: Vec<K>,
        waits: Vec<CompletionHandle>,
        results: &Arc<DashMap<K, NodeOutcome<T>>>,
    ) -> CompletionHandle {
        let work = Arc::clone(&self.work);
        let context = NodeContext {
            dependencies,
            results: Arc::clone(results),
        };
        let results = Arc::clone(results);

        let task = tokio::spawn(async move {
            join_all(waits).await;

            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| work(&node, &context)))
                .unwrap_or_else(|_| NodeOutcome::Failure("unit of work panicked".to_string()));
            results.insert(key, outcome);
        });

        task.map(|_| ()).boxed().shared()
    }
}

enum Frame<N, K> {
    Enter(N),
    Exit(N, K, Vec<N>),
}

/// A spawned task graph; await [`ScheduledForest::join`] for the outcomes
pub struct ScheduledForest<K, T> {
    order: Vec<K>,
    handles: Vec<CompletionHandle>,
    results: Arc<DashMap<K, NodeOutcome<T>>>,
}

impl<K, T> ScheduledForest<K, T>
where
    K: Clone + Eq + Hash,
    T: Clone,
{
    /// Number of distinct nodes scheduled
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of nodes that already reached a terminal state
    pub fn completed(&self) -> usize {
        self.results.len()
    }

    /// Waits until every scheduled node is terminal
    ///
    /// Outcomes are returned in scheduling post-order, so the result is
    /// independent of how the tasks interleaved.
    pub async fn join(self) -> ProcessedForest<K, T> {
        join_all(self.handles).await;

        let outcomes = self
            .order
            .into_iter()
            .map(|key| {
                let outcome = self
                    .results
                    .remove(&key)
                    .map(|(_, outcome)| outcome)
                    .unwrap_or(NodeOutcome::Canceled);
                (key, outcome)
            })
            .collect();

        ProcessedForest { outcomes }
    }
}

/// Flattened outcomes of one processor run
#[derive(Debug, Clone)]
pub struct ProcessedForest<K, T> {
    outcomes: Vec<(K, NodeOutcome<T>)>,
}

impl<K, T> ProcessedForest<K, T>
where
    K: Eq,
{
    /// Outcomes in scheduling post-order
    pub fn outcomes(&self) -> &[(K, NodeOutcome<T>)] {
        &self.outcomes
    }

    pub fn outcome(&self, key: &K) -> Option<&NodeOutcome<T>> {
        self.outcomes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, outcome)| outcome)
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_success()).count()
    }

    /// Nodes that did not succeed, with their outcome
    pub fn unsuccessful(&self) -> impl Iterator<Item = &(K, NodeOutcome<T>)> {
        self.outcomes.iter().filter(|(_, o)| !o.is_success())
    }

    pub fn into_outcomes(self) -> Vec<(K, NodeOutcome<T>)> {
        self.outcomes
    }
}
