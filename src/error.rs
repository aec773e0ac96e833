use crate::definition::NodeKind;
use thiserror::Error;

/// Errors raised by structural graph mutations (connect/disconnect/remove).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' not found in the data scope")]
    NodeNotFound(String),

    #[error("Node id '{0}' already exists in the data scope")]
    DuplicateNodeId(String),

    #[error("Node '{0}' cannot be connected to itself")]
    SelfConnection(String),

    #[error("An edge from '{from_node}' to '{target}' already exists")]
    EdgeExists { from_node: String, target: String },

    #[error("No edge from '{from_node}' to '{target}' to remove")]
    EdgeNotFound { from_node: String, target: String },

    #[error("Source node '{node_id}' is in error state and cannot feed another node")]
    SourceInvalid { node_id: String },

    #[error("Source node '{node_id}' has no output fields to feed downstream")]
    SourceHasNoFields { node_id: String },

    #[error("Source node '{node_id}' already feeds another node; only one outgoing edge is allowed")]
    FanOutExceeded { node_id: String },

    #[error("Output node '{node_id}' is terminal and cannot feed another node")]
    TerminalSource { node_id: String },

    #[error("Node '{node_id}' of type '{kind}' does not accept incoming edges")]
    TargetTakesNoInputs { node_id: String, kind: NodeKind },

    #[error("Node '{node_id}' of type '{kind}' accepts at most {limit} incoming edge(s)")]
    InputLimitReached {
        node_id: String,
        kind: NodeKind,
        limit: usize,
    },

    #[error("Connecting '{from_node}' to '{target}' would create a cycle")]
    CycleDetected { from_node: String, target: String },

    #[error("Node '{node_id}' of type '{kind}' needs {required} connected inputs, but has {found}")]
    InsufficientInputs {
        node_id: String,
        kind: NodeKind,
        required: usize,
        found: usize,
    },
}

/// Errors raised while submitting a node's setting form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("No setting form registered for node type '{0}'")]
    UnknownForm(NodeKind),

    #[error("The '{expected}' form received a '{found}' draft")]
    DraftMismatch { expected: NodeKind, found: NodeKind },

    #[error("Node '{node_id}' requires exactly {required} connected input(s), but has {found}")]
    InputArity {
        node_id: String,
        required: usize,
        found: usize,
    },

    #[error("Duplicate field name '{0}' in the submitted output set")]
    DuplicateFieldName(String),

    #[error("Duplicate display name '{0}' in the submitted output set")]
    DuplicateDisplayName(String),

    #[error("Required meta field '{0}' cannot be deselected")]
    RequiredFieldDeselected(String),

    #[error("Field '{name}' does not exist on '{owner}'")]
    UnknownField { owner: String, name: String },

    #[error("At least one output field must be selected")]
    EmptySelection,

    #[error("Select join fields for both sides")]
    MissingJoinKey,

    #[error("Join key types differ: '{left}' is {left_type}, '{right}' is {right_type}")]
    JoinKeyTypeMismatch {
        left: String,
        left_type: String,
        right: String,
        right_type: String,
    },

    #[error("Add at least one merge rule")]
    EmptyMergeRules,

    #[error("Merge row {row} has an empty output field name")]
    EmptyOutputName { row: usize },

    #[error("Merge row {row} is missing a field for node '{node_id}'")]
    IncompleteMergeRow { row: usize, node_id: String },

    #[error("Merge row {row} mixes fields of different types")]
    MergeTypeConflict { row: usize },

    #[error("Field '{field}' of node '{node_id}' is already used by another merge row")]
    FieldReused { node_id: String, field: String },

    #[error("SQL placeholder '{{{{.{0}}}}}' does not reference a known node")]
    UnknownPlaceholder(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors raised while loading a persisted `data_scope` into a graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("Failed to parse definition JSON: {0}")]
    JsonParseError(String),

    #[error("Node id '{0}' appears more than once in the data scope")]
    DuplicateNodeId(String),

    #[error("Node '{node_id}' lists unknown input node '{missing_id}'")]
    UnknownInputNode { node_id: String, missing_id: String },

    #[error("Edge bookkeeping mismatch: '{from_node}' and '{target}' disagree about their connection")]
    MirrorMismatch { from_node: String, target: String },

    #[error("Node '{0}' declares more than one outgoing edge")]
    FanOutExceeded(String),
}

/// Errors raised by an external view catalog lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("View '{0}' not found in the catalog")]
    ViewNotFound(String),
}
