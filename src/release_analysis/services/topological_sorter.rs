use crate::release_analysis::domain::{ReleaseGraph, ReleaseNodeId};

/// TopologicalSorter service producing a dependency-first release order
///
/// Post-order depth-first search from the roots: every dependency is emitted
/// before the release that needs it. Releases already processed are skipped,
/// so a residual cycle cannot loop forever; releases only reachable through a
/// rootless cycle are visited last so the order stays total.
///
/// The order is only dependency-correct for acyclic regions. Run the
/// [`CycleDetector`](super::CycleDetector) first.
pub struct TopologicalSorter;

impl TopologicalSorter {
    pub fn sort(graph: &ReleaseGraph) -> Vec<ReleaseNodeId> {
        let mut processed = vec![false; graph.len()];
        let mut order = Vec::with_capacity(graph.len());

        let starts: Vec<ReleaseNodeId> = graph
            .roots()
            .map(|n| n.id())
            .chain(graph.nodes().iter().map(|n| n.id()))
            .collect();

        for start in starts {
            let mut stack = vec![(start, false)];

            while let Some((id, expanded)) = stack.pop() {
                if expanded {
                    order.push(id);
                    continue;
                }
                if processed[id.index()] {
                    continue;
                }
                processed[id.index()] = true;
                stack.push((id, true));
                for dependency in graph.node(id).dependencies().iter().rev() {
                    if !processed[dependency.index()] {
                        stack.push((*dependency, false));
                    }
                }
            }
        }

        order
    }
}
