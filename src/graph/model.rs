use crate::definition::{Field, NodeConfig, NodeKind, NodeStatus, Position, QueryType};
use crate::error::GraphError;
use ahash::AHashMap;
use log::debug;
use rand::Rng;
use rand::distr::Alphanumeric;

/// A node in the canonical in-memory model.
///
/// Unlike the persisted [`crate::definition::Node`], this carries no
/// `input_nodes`/`output_nodes` — topology lives in the graph's single edge
/// list — and the persisted `node_status` is split into two flags:
/// `configured` (this node's own form was submitted) and `stale` (an
/// upstream change invalidated it since). [`NodeData::status`] combines
/// them back into the externally observable status.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub id: String,
    pub kind: NodeKind,
    pub title: String,
    pub position: Position,
    pub config: NodeConfig,
    pub output_fields: Vec<Field>,
    pub(crate) configured: bool,
    pub(crate) stale: bool,
}

impl NodeData {
    pub fn status(&self) -> NodeStatus {
        NodeStatus::of(self.configured, self.stale)
    }
}

/// A directed link: the source node's output feeds the target node's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

/// The transformation graph behind one data view.
///
/// Edges are first-class here; `inputs_of`/`outputs_of` are derived from the
/// edge list on demand, so the two directions can never drift apart. Order
/// of `inputs_of` follows edge insertion order, which is what join sides and
/// union columns key on.
#[derive(Debug, Clone)]
pub struct ViewGraph {
    query_type: QueryType,
    nodes: Vec<NodeData>,
    index: AHashMap<String, usize>,
    edges: Vec<Edge>,
}

/// Short random id in the style the canvas generates client-side.
pub(crate) fn nano_id() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

impl ViewGraph {
    pub fn new(query_type: QueryType) -> Self {
        Self {
            query_type,
            nodes: Vec::new(),
            index: AHashMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut NodeData> {
        let idx = self.index.get(id).copied()?;
        Some(&mut self.nodes[idx])
    }

    /// Nodes in data-scope order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Ids of the nodes feeding `id`, in edge insertion order.
    pub fn inputs_of(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.target == id)
            .map(|e| e.source.as_str())
            .collect()
    }

    /// Ids of the nodes fed by `id` (at most one for well-formed graphs).
    pub fn outputs_of(&self, id: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|e| e.source == id)
            .map(|e| e.target.as_str())
            .collect()
    }

    /// Adds a fresh, unconfigured node and returns its generated id.
    ///
    /// The node starts with no edges and observable status `error` until its
    /// own setting form is submitted. A title already taken within this view
    /// is deduped by suffixing a short random id.
    pub fn add_node(&mut self, kind: NodeKind, title: impl Into<String>) -> String {
        self.add_node_with_config(kind, title, NodeConfig::empty_for(kind))
    }

    /// Same as [`Self::add_node`], but with an initial config payload
    /// (e.g. a reference node created from the source picker already knows
    /// its view id).
    pub fn add_node_with_config(
        &mut self,
        kind: NodeKind,
        title: impl Into<String>,
        config: NodeConfig,
    ) -> String {
        let mut id = nano_id();
        while self.index.contains_key(&id) {
            id = nano_id();
        }

        let mut title = title.into();
        if self.nodes.iter().any(|n| n.title == title) {
            title = format!("{}_{}", title, nano_id());
        }

        debug!("add node '{}' ({}) '{}'", id, kind, title);
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(NodeData {
            id: id.clone(),
            kind,
            title,
            position: Position::default(),
            config,
            output_fields: Vec::new(),
            configured: false,
            stale: false,
        });
        id
    }

    /// Removes a node together with every edge touching it, then invalidates
    /// everything downstream of its former targets.
    pub fn remove_node(&mut self, id: &str) -> Result<(), GraphError> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;

        let seeds: Vec<String> = self.outputs_of(id).iter().map(|s| s.to_string()).collect();
        self.edges.retain(|e| e.source != id && e.target != id);
        self.nodes.remove(idx);
        self.rebuild_index();
        debug!("remove node '{}'", id);

        for seed in seeds {
            self.invalidate_downstream(&seed);
        }
        Ok(())
    }

    /// Creates the edge `source -> target` after checking every structural
    /// connection rule. A rejected attempt leaves the graph untouched.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<(), GraphError> {
        let src = self
            .node(source)
            .ok_or_else(|| GraphError::NodeNotFound(source.to_string()))?;
        let tgt = self
            .node(target)
            .ok_or_else(|| GraphError::NodeNotFound(target.to_string()))?;

        if source == target {
            return Err(GraphError::SelfConnection(source.to_string()));
        }
        if self
            .edges
            .iter()
            .any(|e| e.source == source && e.target == target)
        {
            return Err(GraphError::EdgeExists {
                from_node: source.to_string(),
                target: target.to_string(),
            });
        }

        if src.kind.is_terminal() {
            return Err(GraphError::TerminalSource {
                node_id: source.to_string(),
            });
        }
        if src.status() == NodeStatus::Error {
            return Err(GraphError::SourceInvalid {
                node_id: source.to_string(),
            });
        }
        if src.output_fields.is_empty() {
            return Err(GraphError::SourceHasNoFields {
                node_id: source.to_string(),
            });
        }
        if !self.outputs_of(source).is_empty() {
            return Err(GraphError::FanOutExceeded {
                node_id: source.to_string(),
            });
        }

        match tgt.kind.input_limit() {
            Some(0) => {
                return Err(GraphError::TargetTakesNoInputs {
                    node_id: target.to_string(),
                    kind: tgt.kind,
                });
            }
            Some(limit) if self.inputs_of(target).len() >= limit => {
                return Err(GraphError::InputLimitReached {
                    node_id: target.to_string(),
                    kind: tgt.kind,
                    limit,
                });
            }
            _ => {}
        }

        if self.reaches(target, source) {
            return Err(GraphError::CycleDetected {
                from_node: source.to_string(),
                target: target.to_string(),
            });
        }

        debug!("connect '{}' -> '{}'", source, target);
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
        });
        Ok(())
    }

    /// Removes the edge `source -> target` and invalidates the target and
    /// all its transitive downstream: their `output_fields` were derived
    /// from fields that no longer arrive.
    ///
    /// Reconnecting afterwards does not clear the error; only a successful
    /// form submit on each affected node does.
    pub fn disconnect(&mut self, source: &str, target: &str) -> Result<(), GraphError> {
        let pos = self
            .edges
            .iter()
            .position(|e| e.source == source && e.target == target)
            .ok_or_else(|| GraphError::EdgeNotFound {
                from_node: source.to_string(),
                target: target.to_string(),
            })?;
        self.edges.remove(pos);
        debug!("disconnect '{}' -> '{}'", source, target);

        self.invalidate_downstream(target);
        Ok(())
    }

    pub fn set_position(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        node.position = position;
        Ok(())
    }

    /// Writes a submitted form result back: new config, fresh output
    /// schema, and the `success` status that only a form submit can grant.
    pub(crate) fn apply_form_result(&mut self, id: &str, config: NodeConfig, fields: Vec<Field>) {
        if let Some(node) = self.node_mut(id) {
            node.config = config;
            node.output_fields = fields;
            node.configured = true;
            node.stale = false;
        }
    }

    pub(crate) fn insert_loaded(&mut self, node: NodeData) -> Result<(), GraphError> {
        if self.index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNodeId(node.id));
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub(crate) fn push_edge_unchecked(&mut self, source: &str, target: &str) {
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
        });
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }
}
