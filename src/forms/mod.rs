//! Per-node-type setting forms.
//!
//! A form consumes the node's current surroundings (its config, the output
//! schemas of its immediate upstream nodes, the external catalog) plus a
//! user-edited draft, and produces a fresh config and output schema. Only a
//! successful submit moves a node to `success`; the graph itself never
//! grants that status.
//!
//! Forms are looked up in a registry keyed by node type, so hosts can
//! replace a single form without touching the rest.

pub mod join;
pub mod merge;
pub mod output;
pub mod reference;
pub mod sql;

use crate::catalog::ViewCatalog;
use crate::definition::{Field, FieldPick, JoinType, NodeConfig, NodeKind, QueryType, UnionType};
use crate::error::{FormError, GraphError};
use crate::graph::{NodeData, ViewGraph};
use ahash::{AHashMap, AHashSet};
use log::debug;

/// Everything a form sees at submit time.
pub struct FormContext<'a> {
    pub query_type: QueryType,
    pub node: &'a NodeData,
    /// Immediate upstream nodes, in edge order.
    pub inputs: &'a [NodeData],
    /// Every node id in the graph, for textual SQL references.
    pub node_ids: &'a [String],
    pub catalog: &'a dyn ViewCatalog,
}

/// User-edited form state, one variant per node type.
#[derive(Debug, Clone, PartialEq)]
pub enum FormDraft {
    Reference(ReferenceDraft),
    Join(JoinDraft),
    Union(UnionDraft),
    Sql(SqlDraft),
    Output(OutputDraft),
}

impl FormDraft {
    pub fn kind(&self) -> NodeKind {
        match self {
            FormDraft::Reference(_) => NodeKind::View,
            FormDraft::Join(_) => NodeKind::Join,
            FormDraft::Union(_) => NodeKind::Union,
            FormDraft::Sql(_) => NodeKind::Sql,
            FormDraft::Output(_) => NodeKind::Output,
        }
    }
}

/// Field picks against one catalog view. A field absent from `picks` (or
/// present with `selected: false`) is deselected.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDraft {
    pub view_id: String,
    pub picks: Vec<FieldPick>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinDraft {
    pub join_type: JoinType,
    pub left_key: Option<String>,
    pub right_key: Option<String>,
    /// Names chosen from the combined (collision-suffixed) field list.
    pub selected: Vec<String>,
}

/// One output row of a literal row-union mapping: its published name and
/// one source field per input node, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRow {
    pub output_name: String,
    pub picks: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionDraft {
    pub union_type: UnionType,
    /// Only consulted for SQL-typed views; the auto-union path derives
    /// everything from the input schemas.
    pub rows: Vec<MergeRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlDraft {
    pub sql_expression: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputDraft {
    pub selected: Vec<String>,
}

/// A field the auto-union excluded because its type differs across inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConflict {
    pub name: String,
    pub types: Vec<String>,
}

/// What a successful submit produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FormOutcome {
    pub config: NodeConfig,
    pub output_fields: Vec<Field>,
    /// Non-empty only for the auto-union merge path.
    pub conflicts: Vec<MergeConflict>,
}

impl FormOutcome {
    fn new(config: NodeConfig, output_fields: Vec<Field>) -> Self {
        Self {
            config,
            output_fields,
            conflicts: Vec::new(),
        }
    }
}

/// The contract each per-type form implements.
pub trait SettingForm: Send + Sync {
    fn kind(&self) -> NodeKind;
    fn submit(&self, ctx: &FormContext<'_>, draft: &FormDraft) -> Result<FormOutcome, FormError>;
}

/// Rejects a draft of the wrong variant for this form.
fn draft_mismatch<T>(expected: NodeKind, found: &FormDraft) -> Result<T, FormError> {
    Err(FormError::DraftMismatch {
        expected,
        found: found.kind(),
    })
}

/// Enforces the per-type connected-input arity before any form logic runs.
fn require_inputs(node: &NodeData, inputs: &[NodeData]) -> Result<(), FormError> {
    if let Some(required) = node.kind.required_inputs() {
        if inputs.len() != required {
            return Err(FormError::InputArity {
                node_id: node.id.clone(),
                required,
                found: inputs.len(),
            });
        }
    }
    Ok(())
}

/// Both `name` and `display_name` must be unique within one output set.
pub(crate) fn check_unique_fields(fields: &[Field]) -> Result<(), FormError> {
    let mut names: AHashSet<&str> = AHashSet::new();
    let mut displays: AHashSet<&str> = AHashSet::new();
    for field in fields {
        if !names.insert(&field.name) {
            return Err(FormError::DuplicateFieldName(field.name.clone()));
        }
        if !displays.insert(&field.display_name) {
            return Err(FormError::DuplicateDisplayName(field.display_name.clone()));
        }
    }
    Ok(())
}

/// Dispatch table from node type to its setting form.
pub struct FormRegistry {
    forms: AHashMap<NodeKind, Box<dyn SettingForm>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            forms: AHashMap::new(),
        };
        registry.register(Box::new(reference::ReferenceForm));
        registry.register(Box::new(join::JoinForm));
        registry.register(Box::new(merge::MergeForm));
        registry.register(Box::new(sql::SqlForm));
        registry.register(Box::new(output::OutputForm));
        registry
    }

    fn register(&mut self, form: Box<dyn SettingForm>) {
        self.forms.insert(form.kind(), form);
    }

    /// Replaces the form for one node type.
    pub fn with_form(mut self, form: Box<dyn SettingForm>) -> Self {
        self.register(form);
        self
    }

    /// Runs the full submit pipeline for `node_id`: arity check, the
    /// type-specific form, the common uniqueness check, then writes the
    /// result back into the graph and marks the node `success`.
    ///
    /// On any error the node keeps its previous config, fields and status.
    pub fn submit(
        &self,
        graph: &mut ViewGraph,
        catalog: &dyn ViewCatalog,
        node_id: &str,
        draft: &FormDraft,
    ) -> Result<FormOutcome, FormError> {
        let node = graph
            .node(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?
            .clone();

        let inputs: Vec<NodeData> = graph
            .inputs_of(node_id)
            .iter()
            .filter_map(|id| graph.node(id))
            .cloned()
            .collect();
        let node_ids: Vec<String> = graph.nodes().map(|n| n.id.clone()).collect();

        let form = self
            .forms
            .get(&node.kind)
            .ok_or(FormError::UnknownForm(node.kind))?;

        require_inputs(&node, &inputs)?;

        let ctx = FormContext {
            query_type: graph.query_type(),
            node: &node,
            inputs: &inputs,
            node_ids: &node_ids,
            catalog,
        };
        let outcome = form.submit(&ctx, draft)?;
        check_unique_fields(&outcome.output_fields)?;

        debug!(
            "submit '{}' ({}): {} output field(s)",
            node_id,
            node.kind,
            outcome.output_fields.len()
        );
        graph.apply_form_result(node_id, outcome.config.clone(), outcome.output_fields.clone());
        Ok(outcome)
    }
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::new()
    }
}
