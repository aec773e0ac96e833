use serde::{Deserialize, Serialize};

/// One entry in a node's declared output schema.
///
/// `name` is the technical column name, `display_name` the business-facing
/// label; both must be unique within one node's `output_fields`.
/// `original_name` keeps the source column name across renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub original_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<serde_json::Value>,
}

impl Field {
    /// Creates a field whose display and original names mirror the technical name.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            original_name: name.clone(),
            name,
            field_type: field_type.into(),
            comment: String::new(),
            features: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Index-base meta fields that every published schema must carry.
/// These can never be deselected in the reference and output forms.
pub const REQUIRED_META_FIELDS: [&str; 10] = [
    "@timestamp",
    "__data_type",
    "__index_base",
    "__write_time",
    "__id",
    "__tsid",
    "__routing",
    "__category",
    "__pipeline_id",
    "tags",
];

/// Whether `name` is one of the fixed index-base meta fields.
pub fn is_required_meta(name: &str) -> bool {
    REQUIRED_META_FIELDS.contains(&name)
}
