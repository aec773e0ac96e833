//! # Viewscope - Data View Composition Engine
//!
//! **Viewscope** maintains the transformation graph behind a visual "custom
//! data view" builder: typed nodes (reference/join/merge/SQL/output) wired
//! into a directed acyclic graph, each declaring the output schema it
//! produces. The engine enforces the structural connection rules, re-derives
//! per-node schemas as setting forms are submitted, and propagates `error`
//! status through everything downstream of an invalidated node.
//!
//! ## Core Workflow
//!
//! The engine is renderer- and transport-agnostic. It operates on a
//! canonical in-memory model of the graph; the persisted JSON shape
//! (`data_scope`) is a plain serde layer around it. The primary workflow is:
//!
//! 1.  **Load or start a view**: parse a persisted [`DataViewDefinition`]
//!     (or start empty) and build an [`Editor`] from it.
//! 2.  **Edit the graph**: feed user interactions to [`Editor::apply`] —
//!     connect, disconnect, select, remove. Illegal edges are rejected at
//!     the interaction boundary and never enter the model.
//! 3.  **Configure nodes**: run each node's setting form through a
//!     [`FormRegistry`]. A successful submit recomputes the node's
//!     `output_fields` and is the only way a node reaches `success`.
//! 4.  **Save**: serialize the graph back into the definition's
//!     `data_scope` and hand it to whatever owns persistence.
//!
//! [`DataViewDefinition`]: definition::DataViewDefinition
//! [`Editor`]: editor::Editor
//! [`Editor::apply`]: editor::Editor::apply
//! [`FormRegistry`]: forms::FormRegistry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use viewscope::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // The catalog stands in for the backend that owns view metadata.
//!     let mut catalog = InMemoryCatalog::new();
//!     catalog.insert(
//!         "orders",
//!         vec![Field::new("id", "int"), Field::new("amount", "double")],
//!     );
//!
//!     let mut editor = Editor::new(QueryType::Sql);
//!     let registry = FormRegistry::new();
//!
//!     // Reference the "orders" view and select both of its fields.
//!     let orders = editor
//!         .apply(EditorAction::AddNode {
//!             kind: NodeKind::View,
//!             title: "Orders".to_string(),
//!             config: None,
//!         })?
//!         .expect("AddNode returns the new id");
//!     editor.submit_form(
//!         &registry,
//!         &catalog,
//!         &orders,
//!         &FormDraft::Reference(ReferenceDraft {
//!             view_id: "orders".to_string(),
//!             picks: vec![FieldPick::selected("id"), FieldPick::selected("amount")],
//!         }),
//!     )?;
//!
//!     // Publish through an output node.
//!     let published = editor
//!         .apply(EditorAction::AddNode {
//!             kind: NodeKind::Output,
//!             title: "Published".to_string(),
//!             config: None,
//!         })?
//!         .expect("AddNode returns the new id");
//!     editor.apply(EditorAction::Connect {
//!         source: orders.clone(),
//!         target: published.clone(),
//!     })?;
//!     editor.submit_form(
//!         &registry,
//!         &catalog,
//!         &published,
//!         &FormDraft::Output(OutputDraft {
//!             selected: vec!["id".to_string(), "amount".to_string()],
//!         }),
//!     )?;
//!
//!     // Serialize for the save call.
//!     let mut def = DataViewDefinition::new("dv-1", "Orders view", QueryType::Sql);
//!     editor.graph().apply_to(&mut def);
//!     println!("{}", def.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod definition;
pub mod editor;
pub mod error;
pub mod forms;
pub mod graph;
pub mod prelude;
pub mod sql;
