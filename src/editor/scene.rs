//! Render-time reconciliation.
//!
//! A renderer keeps a [`SceneState`] mirroring what it last drew. On every
//! graph change it asks for a diff instead of redrawing from scratch: nodes
//! are matched by id, edges by `(source, target)` pair, so re-rendering an
//! unchanged graph never duplicates anything.

use crate::definition::{NodeKind, NodeStatus, Position};
use crate::graph::ViewGraph;
use ahash::{AHashMap, AHashSet};

/// What the renderer needs to know about one node.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: String,
    pub title: String,
    pub kind: NodeKind,
    pub position: Position,
    pub status: NodeStatus,
    pub field_count: usize,
    pub selected: bool,
}

/// One change the renderer must apply.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenePatch {
    CreateNode(SceneNode),
    UpdateNode(SceneNode),
    RemoveNode(String),
    CreateEdge { source: String, target: String },
    RemoveEdge { source: String, target: String },
}

/// The renderer's last-known nodes and edges.
#[derive(Debug, Default)]
pub struct SceneState {
    nodes: AHashMap<String, SceneNode>,
    edges: AHashSet<(String, String)>,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Diffs `graph` (with `selected` highlighting) against this scene,
    /// updates the scene, and returns the patches in a safe application
    /// order: stale edges out first, then stale nodes, then node
    /// creations/updates, then new edges.
    pub fn reconcile(&mut self, graph: &ViewGraph, selected: Option<&str>) -> Vec<ScenePatch> {
        let desired_nodes: AHashMap<String, SceneNode> = graph
            .nodes()
            .map(|n| {
                (
                    n.id.clone(),
                    SceneNode {
                        id: n.id.clone(),
                        title: n.title.clone(),
                        kind: n.kind,
                        position: n.position,
                        status: n.status(),
                        field_count: n.output_fields.len(),
                        selected: selected == Some(n.id.as_str()),
                    },
                )
            })
            .collect();
        let desired_edges: AHashSet<(String, String)> = graph
            .edges()
            .iter()
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect();

        let mut patches = Vec::new();

        for (source, target) in self.edges.iter() {
            if !desired_edges.contains(&(source.clone(), target.clone())) {
                patches.push(ScenePatch::RemoveEdge {
                    source: source.clone(),
                    target: target.clone(),
                });
            }
        }
        for id in self.nodes.keys() {
            if !desired_nodes.contains_key(id) {
                patches.push(ScenePatch::RemoveNode(id.clone()));
            }
        }
        for (id, node) in &desired_nodes {
            match self.nodes.get(id) {
                None => patches.push(ScenePatch::CreateNode(node.clone())),
                Some(existing) if existing != node => {
                    patches.push(ScenePatch::UpdateNode(node.clone()));
                }
                Some(_) => {}
            }
        }
        for (source, target) in desired_edges.iter() {
            if !self.edges.contains(&(source.clone(), target.clone())) {
                patches.push(ScenePatch::CreateEdge {
                    source: source.clone(),
                    target: target.clone(),
                });
            }
        }

        self.nodes = desired_nodes;
        self.edges = desired_edges;
        patches
    }
}
