//! External view details.
//!
//! The reference form needs the field list of a previously saved view. The
//! backend owning that lookup is out of scope, so it enters the engine
//! through this trait; hosts wire in an HTTP-backed implementation, tests
//! and the CLI use [`InMemoryCatalog`].

use crate::definition::Field;
use crate::error::CatalogError;
use ahash::AHashMap;
use serde::Deserialize;

/// Source of truth for the schemas of referenceable views.
pub trait ViewCatalog: Send + Sync {
    fn view_fields(&self, view_id: &str) -> Result<Vec<Field>, CatalogError>;
}

/// A catalog held fully in memory, loadable from a JSON map of
/// `view_id -> field list`.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    views: AHashMap<String, Vec<Field>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, view_id: impl Into<String>, fields: Vec<Field>) {
        self.views.insert(view_id.into(), fields);
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Raw(AHashMap<String, Vec<Field>>);
        let Raw(views) = serde_json::from_str(json)?;
        Ok(Self { views })
    }
}

impl ViewCatalog for InMemoryCatalog {
    fn view_fields(&self, view_id: &str) -> Result<Vec<Field>, CatalogError> {
        self.views
            .get(view_id)
            .cloned()
            .ok_or_else(|| CatalogError::ViewNotFound(view_id.to_string()))
    }
}
