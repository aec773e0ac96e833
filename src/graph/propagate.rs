//! Downstream validity propagation.
//!
//! When an edge is removed or a node deleted, every node still reachable
//! from the invalidation point holds an output schema derived from fields
//! that no longer arrive. Those nodes are flagged `error` and their
//! `output_fields` cleared; each one recovers only when its own setting
//! form is resubmitted.

use super::model::ViewGraph;
use ahash::AHashSet;
use log::debug;

impl ViewGraph {
    /// Forward transitive closure from `start` over the edge list,
    /// including `start` itself. Work-list BFS; cost is proportional to the
    /// reachable region, not the whole graph.
    pub fn downstream_of(&self, start: &str) -> Vec<String> {
        let mut seen: AHashSet<String> = AHashSet::new();
        let mut queue: Vec<String> = vec![start.to_string()];
        let mut order = Vec::new();

        while let Some(id) = queue.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            for next in self.outputs_of(&id) {
                queue.push(next.to_string());
            }
            order.push(id);
        }
        order
    }

    /// Marks `start` and everything downstream of it stale, clearing their
    /// output schemas.
    pub(crate) fn invalidate_downstream(&mut self, start: &str) {
        for id in self.downstream_of(start) {
            if let Some(node) = self.node_mut(&id) {
                node.output_fields.clear();
                node.stale = true;
                debug!("invalidated '{}'", id);
            }
        }
    }

    /// Whether `to` is reachable from `from` by following edges forward.
    pub(crate) fn reaches(&self, from: &str, to: &str) -> bool {
        self.downstream_of(from).iter().any(|id| id == to)
    }
}
