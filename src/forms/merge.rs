use super::{FormContext, FormDraft, FormOutcome, MergeConflict, SettingForm, UnionDraft, draft_mismatch};
use crate::definition::{Field, NodeConfig, NodeKind, QueryType, UnionConfig, UnionFieldRef};
use crate::error::FormError;
use ahash::AHashMap;
use itertools::Itertools;

/// Settings for a `union` node.
///
/// SQL-typed views get a literal row-union mapping: each output row names
/// one source field per input, all of the same type. Everything else is
/// auto-unioned by field name, with type conflicts excluded per field.
pub struct MergeForm;

impl SettingForm for MergeForm {
    fn kind(&self) -> NodeKind {
        NodeKind::Union
    }

    fn submit(&self, ctx: &FormContext<'_>, draft: &FormDraft) -> Result<FormOutcome, FormError> {
        let draft = match draft {
            FormDraft::Union(d) => d,
            other => return draft_mismatch(self.kind(), other),
        };

        if ctx.query_type == QueryType::Sql {
            submit_row_union(ctx, draft)
        } else {
            submit_auto_union(ctx, draft)
        }
    }
}

fn submit_row_union(ctx: &FormContext<'_>, draft: &UnionDraft) -> Result<FormOutcome, FormError> {
    if draft.rows.is_empty() {
        return Err(FormError::EmptyMergeRules);
    }

    let inputs = ctx.inputs;
    let mut used: Vec<ahash::AHashSet<String>> = vec![ahash::AHashSet::new(); inputs.len()];
    let mut validated_rows: Vec<Vec<String>> = Vec::new();
    let mut output_fields = Vec::new();

    for (row_idx, row) in draft.rows.iter().enumerate() {
        let name = row.output_name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyOutputName { row: row_idx });
        }

        let mut row_type: Option<String> = None;
        let mut first_source: Option<&Field> = None;
        let mut row_picks: Vec<String> = Vec::new();

        for (i, input) in inputs.iter().enumerate() {
            let pick = row
                .picks
                .get(i)
                .and_then(|p| p.as_deref())
                .filter(|p| !p.is_empty())
                .ok_or_else(|| FormError::IncompleteMergeRow {
                    row: row_idx,
                    node_id: input.id.clone(),
                })?;

            let field = input
                .output_fields
                .iter()
                .find(|f| f.name == pick)
                .ok_or_else(|| FormError::UnknownField {
                    owner: input.id.clone(),
                    name: pick.to_string(),
                })?;

            if !used[i].insert(pick.to_string()) {
                return Err(FormError::FieldReused {
                    node_id: input.id.clone(),
                    field: pick.to_string(),
                });
            }
            row_picks.push(pick.to_string());

            match &row_type {
                None => {
                    row_type = Some(field.field_type.clone());
                    first_source = Some(field);
                }
                Some(t) if *t != field.field_type => {
                    return Err(FormError::MergeTypeConflict { row: row_idx });
                }
                Some(_) => {}
            }
        }

        let (Some(source), Some(field_type)) = (first_source, row_type) else {
            return Err(FormError::IncompleteMergeRow {
                row: row_idx,
                node_id: ctx.node.id.clone(),
            });
        };
        output_fields.push(Field {
            name: name.to_string(),
            original_name: name.to_string(),
            display_name: name.to_string(),
            field_type,
            comment: source.comment.clone(),
            features: source.features.clone(),
        });
        validated_rows.push(row_picks);
    }

    // Outer index per input node, inner index per output row.
    let union_fields: Vec<Vec<UnionFieldRef>> = (0..inputs.len())
        .map(|i| {
            validated_rows
                .iter()
                .map(|row| UnionFieldRef {
                    field: row[i].clone(),
                    value_from: "field".to_string(),
                })
                .collect()
        })
        .collect();

    Ok(FormOutcome::new(
        NodeConfig::Union(UnionConfig {
            union_type: draft.union_type,
            union_fields,
        }),
        output_fields,
    ))
}

fn submit_auto_union(ctx: &FormContext<'_>, draft: &UnionDraft) -> Result<FormOutcome, FormError> {
    // Group every input field by name, keeping first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut groups: AHashMap<String, Vec<&Field>> = AHashMap::new();
    for input in ctx.inputs {
        for field in &input.output_fields {
            if !groups.contains_key(&field.name) {
                order.push(field.name.clone());
            }
            groups.entry(field.name.clone()).or_default().push(field);
        }
    }

    let mut output_fields = Vec::new();
    let mut conflicts = Vec::new();

    for name in order {
        let fields = &groups[&name];
        let first = fields[0];

        if !fields.iter().all(|f| f.field_type == first.field_type) {
            conflicts.push(MergeConflict {
                name,
                types: fields
                    .iter()
                    .map(|f| f.field_type.clone())
                    .unique()
                    .collect(),
            });
            continue;
        }

        let comments_match = fields.iter().all(|f| f.comment == first.comment);
        let features_match = fields.iter().all(|f| f.features == first.features);

        output_fields.push(Field {
            name,
            field_type: first.field_type.clone(),
            original_name: first.original_name.clone(),
            display_name: first.display_name.clone(),
            comment: if comments_match {
                first.comment.clone()
            } else {
                String::new()
            },
            features: if features_match {
                first.features.clone()
            } else {
                Vec::new()
            },
        });
    }

    let mut outcome = FormOutcome::new(
        NodeConfig::Union(UnionConfig {
            union_type: draft.union_type,
            union_fields: Vec::new(),
        }),
        output_fields,
    );
    outcome.conflicts = conflicts;
    Ok(outcome)
}
