use crate::release_analysis::domain::{
    CircularDependencyChain, ReleaseGraph, ReleaseNodeId, ReleaseRevision,
};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

/// How a run treats circular release dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Cycles make the run fail
    #[default]
    Fail,
    /// Cycles are reported but the run still succeeds
    Warn,
}

impl FromStr for CyclePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(CyclePolicy::Fail),
            "warn" => Ok(CyclePolicy::Warn),
            _ => Err(format!(
                "Invalid cycle policy: {}. Valid values are: fail, warn",
                s
            )),
        }
    }
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyclePolicy::Fail => write!(f, "fail"),
            CyclePolicy::Warn => write!(f, "warn"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Undiscovered,
    OnPath,
    /// Explored without ever meeting the current path; no loop runs through it
    Acyclic,
}

struct Frame {
    id: ReleaseNodeId,
    dependencies: Vec<ReleaseNodeId>,
    next: usize,
    reached_path: bool,
}

impl Frame {
    fn new(graph: &ReleaseGraph, id: ReleaseNodeId) -> Self {
        Self {
            id,
            dependencies: graph.node(id).dependencies().iter().copied().collect(),
            next: 0,
            reached_path: false,
        }
    }
}

/// CycleDetector service reporting circular release dependencies
///
/// Depth-first search from every root, then from any node never visited
/// (a cycle nobody depends on has no root). The stack of open frames is the
/// current path; meeting a node on that path closes a loop. Loops found again
/// from another entry point are dropped by their member set.
///
/// Only nodes whose exploration never met the current path are pruned from
/// later searches. A node that did is re-entered from other paths, so loops
/// sharing nodes (`a -> b -> a` and `a -> c -> b -> a`) are all reported.
///
/// The detector never breaks cycles.
pub struct CycleDetector;

impl CycleDetector {
    /// Returns the distinct cycles in discovery order
    ///
    /// # Errors
    /// Returns an `InvariantViolation` if the path bookkeeping is inconsistent.
    pub fn detect(graph: &ReleaseGraph) -> Result<Vec<CircularDependencyChain>> {
        let mut state = vec![VisitState::Undiscovered; graph.len()];
        let mut visited = vec![false; graph.len()];
        let mut seen: HashSet<BTreeSet<ReleaseRevision>> = HashSet::new();
        let mut cycles = Vec::new();

        let starts: Vec<ReleaseNodeId> = graph
            .roots()
            .map(|n| n.id())
            .chain(graph.nodes().iter().map(|n| n.id()))
            .collect();

        for start in starts {
            // Every loop reachable from a visited node was already walked
            if visited[start.index()] {
                continue;
            }

            visited[start.index()] = true;
            state[start.index()] = VisitState::OnPath;
            let mut stack = vec![Frame::new(graph, start)];

            while let Some(frame) = stack.last_mut() {
                if frame.next == frame.dependencies.len() {
                    let reached_path = frame.reached_path;
                    let finished = frame.id;
                    stack.pop();

                    if reached_path {
                        state[finished.index()] = VisitState::Undiscovered;
                        if let Some(parent) = stack.last_mut() {
                            parent.reached_path = true;
                        }
                    } else {
                        state[finished.index()] = VisitState::Acyclic;
                    }
                    continue;
                }

                let dependency = frame.dependencies[frame.next];
                frame.next += 1;

                match state[dependency.index()] {
                    VisitState::Acyclic => {}
                    VisitState::Undiscovered => {
                        visited[dependency.index()] = true;
                        state[dependency.index()] = VisitState::OnPath;
                        stack.push(Frame::new(graph, dependency));
                    }
                    VisitState::OnPath => {
                        frame.reached_path = true;
                        let start_of_loop = stack
                            .iter()
                            .position(|f| f.id == dependency)
                            .ok_or_else(|| {
                                AnalysisError::invariant(format!(
                                    "release {} is marked on-path but is not on the path",
                                    graph.node(dependency).revision()
                                ))
                            })?;

                        let mut revisions: Vec<_> = stack[start_of_loop..]
                            .iter()
                            .map(|f| graph.node(f.id).revision().clone())
                            .collect();
                        revisions.push(graph.node(dependency).revision().clone());

                        let chain = CircularDependencyChain::new(revisions)?;
                        if seen.insert(chain.dedup_key()) {
                            cycles.push(chain);
                        }
                    }
                }
            }
        }

        Ok(cycles)
    }

    /// Node ids involved in any of `cycles`
    pub fn members(graph: &ReleaseGraph, cycles: &[CircularDependencyChain]) -> BTreeSet<ReleaseNodeId> {
        cycles
            .iter()
            .flat_map(|c| c.revisions().iter())
            .filter_map(|r| graph.find(r).map(|n| n.id()))
            .collect()
    }
}
