use super::field::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five node types a data-view graph is composed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// References a previously saved (atomic or custom) view.
    View,
    /// Publishes the final field subset. Terminal; exactly one input.
    Output,
    /// Row-union of two inputs.
    Union,
    /// Keyed join of two inputs.
    Join,
    /// Free-text SQL over upstream nodes via `{{.nodeId}}` placeholders.
    Sql,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::View => "view",
            NodeKind::Output => "output",
            NodeKind::Union => "union",
            NodeKind::Join => "join",
            NodeKind::Sql => "sql",
        }
    }

    /// Maximum number of incoming edges, or `None` when unbounded (sql).
    pub fn input_limit(&self) -> Option<usize> {
        match self {
            NodeKind::View => Some(0),
            NodeKind::Output => Some(1),
            NodeKind::Union | NodeKind::Join => Some(2),
            NodeKind::Sql => None,
        }
    }

    /// Number of connected inputs this node needs before its form can
    /// succeed, or `None` when any number is acceptable.
    pub fn required_inputs(&self) -> Option<usize> {
        match self {
            NodeKind::View => Some(0),
            NodeKind::Output => Some(1),
            NodeKind::Union | NodeKind::Join => Some(2),
            NodeKind::Sql => None,
        }
    }

    /// Terminal nodes emit no further edges.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeKind::Output)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas coordinates. Rendering-only; never semantic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// The externally observable validity of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Success,
    Error,
}

impl NodeStatus {
    /// Combines the two internal validity flags into the persisted status.
    /// A node is `success` once its own form was submitted and no upstream
    /// change has invalidated it since.
    pub fn of(configured: bool, stale: bool) -> Self {
        if configured && !stale {
            NodeStatus::Success
        } else {
            NodeStatus::Error
        }
    }
}

/// Join flavor for `join` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "inner")]
    Inner,
    #[serde(rename = "full outer")]
    FullOuter,
}

/// Row handling for `union` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnionType {
    #[default]
    All,
    Distinct,
}

/// A field selection entry in a reference node's config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPick {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl FieldPick {
    pub fn selected(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            selected: true,
        }
    }

    pub fn renamed(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: Some(display_name.into()),
            selected: true,
        }
    }
}

/// One side of a join: which field of which input node is the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinKey {
    pub node_id: String,
    pub field: String,
}

/// One cell of a union row mapping: the source field feeding an output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnionFieldRef {
    pub field: String,
    #[serde(default = "default_value_from")]
    pub value_from: String,
}

fn default_value_from() -> String {
    "field".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    pub view_id: String,
    #[serde(default)]
    pub fields: Vec<FieldPick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinConfig {
    pub join_type: JoinType,
    /// Exactly two entries once configured: left key, right key.
    #[serde(default)]
    pub join_fields: Vec<JoinKey>,
    #[serde(default)]
    pub selected_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct UnionConfig {
    pub union_type: UnionType,
    /// SQL-typed views only: outer index follows `input_nodes` order, inner
    /// index is the output row position.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub union_fields: Vec<Vec<UnionFieldRef>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SqlConfig {
    pub sql_expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub selected_fields: Vec<String>,
}

/// Type-specific node configuration. The variant always matches the owning
/// node's `type`; the serialized shape is the bare payload object, so each
/// variant carries at least one distinguishing required key (`view_id`,
/// `join_type`, `sql_expression`, `union_type`), with the all-optional
/// output payload tried last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeConfig {
    Reference(ReferenceConfig),
    Join(JoinConfig),
    Sql(SqlConfig),
    Union(UnionConfig),
    Output(OutputConfig),
}

impl NodeConfig {
    /// An unconfigured payload of the right shape for `kind`.
    pub fn empty_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::View => NodeConfig::Reference(ReferenceConfig::default()),
            NodeKind::Join => NodeConfig::Join(JoinConfig {
                join_type: JoinType::Inner,
                join_fields: Vec::new(),
                selected_fields: Vec::new(),
            }),
            NodeKind::Union => NodeConfig::Union(UnionConfig::default()),
            NodeKind::Sql => NodeConfig::Sql(SqlConfig::default()),
            NodeKind::Output => NodeConfig::Output(OutputConfig::default()),
        }
    }
}

/// One step of a data-view transformation graph, in its persisted shape.
///
/// `input_nodes`/`output_nodes` mirror the edge list: an edge `A -> B` is
/// stored as `A.id ∈ B.input_nodes` and `B.id ∈ A.output_nodes`. The
/// in-memory model keeps a single edge list instead and derives both sides
/// on save (see `graph`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub title: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub input_nodes: Vec<String>,
    #[serde(default)]
    pub output_nodes: Vec<String>,
    pub config: NodeConfig,
    #[serde(default)]
    pub output_fields: Vec<Field>,
    pub node_status: NodeStatus,
}
