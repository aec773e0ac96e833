//! Conversion between the persisted `data_scope` shape and the canonical
//! in-memory model.
//!
//! Loading rebuilds the edge list from each node's `input_nodes` (in
//! data-scope order, so edge order round-trips) and validates what the
//! dual-bookkeeping shape cannot guarantee by construction: referential
//! integrity, mirror consistency, and the single-output rule.

use super::model::{NodeData, ViewGraph};
use crate::definition::{DataViewDefinition, Node, NodeStatus};
use crate::error::{DefinitionError, GraphError};

impl ViewGraph {
    /// Builds a graph from a persisted definition.
    ///
    /// A node listing an input that does not exist in the data scope is
    /// rejected outright — a dangling reference can only be produced by a
    /// writer that removed a node without cleaning up its edges.
    pub fn from_definition(def: &DataViewDefinition) -> Result<Self, DefinitionError> {
        let mut graph = ViewGraph::new(def.query_type);

        for node in &def.data_scope {
            graph
                .insert_loaded(NodeData {
                    id: node.id.clone(),
                    kind: node.kind,
                    title: node.title.clone(),
                    position: node.position,
                    config: node.config.clone(),
                    output_fields: node.output_fields.clone(),
                    configured: node.node_status == NodeStatus::Success,
                    stale: false,
                })
                .map_err(|e| match e {
                    GraphError::DuplicateNodeId(id) => DefinitionError::DuplicateNodeId(id),
                    other => DefinitionError::JsonParseError(other.to_string()),
                })?;
        }

        for node in &def.data_scope {
            for input in &node.input_nodes {
                if !graph.contains(input) {
                    return Err(DefinitionError::UnknownInputNode {
                        node_id: node.id.clone(),
                        missing_id: input.clone(),
                    });
                }
                graph.push_edge_unchecked(input, &node.id);
            }
        }

        for node in &def.data_scope {
            let derived = graph.outputs_of(&node.id);
            if derived.len() > 1 || node.output_nodes.len() > 1 {
                return Err(DefinitionError::FanOutExceeded(node.id.clone()));
            }
            for declared in &node.output_nodes {
                if !derived.contains(&declared.as_str()) {
                    return Err(DefinitionError::MirrorMismatch {
                        from_node: node.id.clone(),
                        target: declared.clone(),
                    });
                }
            }
            for target in derived {
                if !node.output_nodes.iter().any(|t| t == target) {
                    return Err(DefinitionError::MirrorMismatch {
                        from_node: node.id.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }

        Ok(graph)
    }

    /// Serializes the graph back into the persisted node array, deriving
    /// `input_nodes`/`output_nodes` from the edge list.
    pub fn to_data_scope(&self) -> Vec<Node> {
        self.nodes()
            .map(|n| Node {
                id: n.id.clone(),
                kind: n.kind,
                title: n.title.clone(),
                position: n.position,
                input_nodes: self
                    .inputs_of(&n.id)
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                output_nodes: self
                    .outputs_of(&n.id)
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                config: n.config.clone(),
                output_fields: n.output_fields.clone(),
                node_status: n.status(),
            })
            .collect()
    }

    /// Replaces `def.data_scope` with this graph's current state.
    pub fn apply_to(&self, def: &mut DataViewDefinition) {
        def.data_scope = self.to_data_scope();
    }
}
