//! Prelude module for convenient imports
//!
//! Re-exports the types most hosts touch: the editor, the graph, the form
//! registry with its drafts, the persisted definition shapes, and the
//! error enums.

// Editing surface
pub use crate::editor::{Editor, EditorAction, SceneNode, ScenePatch, SceneState};

// Graph model
pub use crate::graph::{Edge, NodeData, ViewGraph};

// Setting forms
pub use crate::forms::{
    FormDraft, FormOutcome, FormRegistry, JoinDraft, MergeConflict, MergeRow, OutputDraft,
    ReferenceDraft, SettingForm, SqlDraft, UnionDraft,
};

// Persisted shapes
pub use crate::definition::{
    DataViewDefinition, Field, FieldPick, JoinType, Node, NodeConfig, NodeKind, NodeStatus,
    Position, QueryType, UnionType, REQUIRED_META_FIELDS,
};

// External collaborators
pub use crate::catalog::{InMemoryCatalog, ViewCatalog};
pub use crate::sql::{BasicFormatter, SqlFormatter, format_preserving_placeholders};

// Error types
pub use crate::error::{CatalogError, DefinitionError, FormError, GraphError};

/// Result type alias for convenience in examples and tools.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
