//! Persisted data-view shapes.
//!
//! Everything here serializes to the plain-JSON `data_scope` contract the
//! backend stores verbatim. The in-memory graph model lives in [`crate::graph`]
//! and converts to and from these shapes losslessly.

pub mod field;
pub mod node;

pub use field::*;
pub use node::*;

use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};

/// How the backing store executes this view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Sql,
    Dsl,
    IndexBase,
}

/// A complete custom data view: basic info plus the transformation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataViewDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comment: String,
    pub query_type: QueryType,
    #[serde(default)]
    pub primary_keys: Vec<String>,
    /// Ordered node descriptors. Topology is carried by each node's
    /// `input_nodes`/`output_nodes`, not by array order.
    #[serde(default)]
    pub data_scope: Vec<Node>,
}

impl DataViewDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, query_type: QueryType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group_name: String::new(),
            tags: Vec::new(),
            comment: String::new(),
            query_type,
            primary_keys: Vec::new(),
            data_scope: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, DefinitionError> {
        serde_json::to_string_pretty(self).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }
}
