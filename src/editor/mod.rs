//! The canvas-facing controller.
//!
//! Translates user interactions into graph mutations, owns the selection
//! state explicitly (at most one node), and reconciles the graph against a
//! renderer's scene. The graph itself stays renderer-agnostic.

mod scene;

pub use scene::{SceneNode, ScenePatch, SceneState};

use crate::catalog::ViewCatalog;
use crate::definition::{DataViewDefinition, NodeConfig, NodeKind, Position, QueryType};
use crate::error::{DefinitionError, FormError, GraphError};
use crate::forms::{FormDraft, FormOutcome, FormRegistry};
use crate::graph::ViewGraph;
use ahash::AHashMap;

const LAYOUT_X0: f64 = 80.0;
const LAYOUT_Y0: f64 = 60.0;
const LAYOUT_X_GAP: f64 = 260.0;
const LAYOUT_Y_GAP: f64 = 140.0;

/// One user interaction on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    AddNode {
        kind: NodeKind,
        title: String,
        config: Option<NodeConfig>,
    },
    RemoveNode {
        id: String,
    },
    Connect {
        source: String,
        target: String,
    },
    Disconnect {
        source: String,
        target: String,
    },
    Select {
        id: String,
    },
    ClearSelection,
    MoveNode {
        id: String,
        position: Position,
    },
}

/// Owns one graph plus the canvas interaction state around it.
#[derive(Debug, Clone)]
pub struct Editor {
    graph: ViewGraph,
    selected: Option<String>,
}

impl Editor {
    pub fn new(query_type: QueryType) -> Self {
        Self::from_graph(ViewGraph::new(query_type))
    }

    pub fn from_graph(graph: ViewGraph) -> Self {
        Self {
            graph,
            selected: None,
        }
    }

    pub fn from_definition(def: &DataViewDefinition) -> Result<Self, DefinitionError> {
        Ok(Self::from_graph(ViewGraph::from_definition(def)?))
    }

    pub fn graph(&self) -> &ViewGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ViewGraph {
        &mut self.graph
    }

    /// Id of the currently selected node, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Applies one interaction. Returns the new node's id for `AddNode`,
    /// `None` otherwise. A rejected action leaves graph and selection
    /// untouched.
    pub fn apply(&mut self, action: EditorAction) -> Result<Option<String>, GraphError> {
        match action {
            EditorAction::AddNode {
                kind,
                title,
                config,
            } => {
                let config = config.unwrap_or_else(|| NodeConfig::empty_for(kind));
                Ok(Some(self.graph.add_node_with_config(kind, title, config)))
            }
            EditorAction::RemoveNode { id } => {
                self.graph.remove_node(&id)?;
                if self.selected.as_deref() == Some(id.as_str()) {
                    self.selected = None;
                }
                Ok(None)
            }
            EditorAction::Connect { source, target } => {
                self.graph.connect(&source, &target)?;
                Ok(None)
            }
            EditorAction::Disconnect { source, target } => {
                self.graph.disconnect(&source, &target)?;
                Ok(None)
            }
            EditorAction::Select { id } => {
                self.select(&id)?;
                Ok(None)
            }
            EditorAction::ClearSelection => {
                self.selected = None;
                Ok(None)
            }
            EditorAction::MoveNode { id, position } => {
                self.graph.set_position(&id, position)?;
                Ok(None)
            }
        }
    }

    /// Marks `id` selected, replacing any previous selection.
    ///
    /// A join or union node cannot be opened until both of its inputs are
    /// connected; selecting one earlier is rejected so the form never sees
    /// a half-wired node.
    pub fn select(&mut self, id: &str) -> Result<(), GraphError> {
        let node = self
            .graph
            .node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;

        if matches!(node.kind, NodeKind::Join | NodeKind::Union) {
            let found = self.graph.inputs_of(id).len();
            if found < 2 {
                return Err(GraphError::InsufficientInputs {
                    node_id: id.to_string(),
                    kind: node.kind,
                    required: 2,
                    found,
                });
            }
        }
        self.selected = Some(id.to_string());
        Ok(())
    }

    /// Submits the selected-or-named node's setting form through `registry`.
    pub fn submit_form(
        &mut self,
        registry: &FormRegistry,
        catalog: &dyn ViewCatalog,
        node_id: &str,
        draft: &FormDraft,
    ) -> Result<FormOutcome, FormError> {
        registry.submit(&mut self.graph, catalog, node_id, draft)
    }

    /// Diffs the graph against `scene` and returns the patches a renderer
    /// must apply. Reconciling twice in a row yields nothing the second
    /// time.
    pub fn reconcile(&self, scene: &mut SceneState) -> Vec<ScenePatch> {
        scene.reconcile(&self.graph, self.selected())
    }

    /// Repositions every node on a depth-ordered grid. The only operation
    /// that moves nodes the user did not drag.
    pub fn format_layout(&mut self) {
        let depths = self.node_depths();
        let mut rows: AHashMap<usize, usize> = AHashMap::new();

        let ids: Vec<String> = self.graph.nodes().map(|n| n.id.clone()).collect();
        for id in ids {
            let depth = depths.get(&id).copied().unwrap_or(0);
            let row = rows.entry(depth).or_insert(0);
            let position = Position {
                x: LAYOUT_X0 + depth as f64 * LAYOUT_X_GAP,
                y: LAYOUT_Y0 + *row as f64 * LAYOUT_Y_GAP,
            };
            *row += 1;
            let _ = self.graph.set_position(&id, position);
        }
    }

    /// Longest-path depth of each node, via Kahn's ordering over the edge
    /// list. The graph is acyclic by construction, so this visits every
    /// node exactly once.
    fn node_depths(&self) -> AHashMap<String, usize> {
        let mut in_degree: AHashMap<String, usize> = self
            .graph
            .nodes()
            .map(|n| (n.id.clone(), self.graph.inputs_of(&n.id).len()))
            .collect();
        let mut depths: AHashMap<String, usize> = AHashMap::new();
        let mut queue: Vec<String> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(id, _)| id.clone())
            .collect();

        while let Some(id) = queue.pop() {
            let depth = depths.get(&id).copied().unwrap_or(0);
            for target in self.graph.outputs_of(&id) {
                let target = target.to_string();
                let entry = depths.entry(target.clone()).or_insert(0);
                *entry = (*entry).max(depth + 1);
                if let Some(remaining) = in_degree.get_mut(&target) {
                    *remaining -= 1;
                    if *remaining == 0 {
                        queue.push(target);
                    }
                }
            }
            depths.entry(id).or_insert(depth);
        }
        depths
    }
}
