use super::{FormContext, FormDraft, FormOutcome, SettingForm, draft_mismatch};
use crate::definition::{Field, JoinConfig, JoinKey, NodeConfig, NodeKind};
use crate::error::FormError;
use crate::graph::NodeData;

/// Settings for a `join` node: one key per side, a join type, and the
/// published subset of the combined field list.
pub struct JoinForm;

/// Left fields followed by right fields; a name present on both sides is
/// suffixed with its own source node's title so the combined list stays
/// unambiguous. `original_name` survives the rename.
pub(crate) fn combined_fields(left: &NodeData, right: &NodeData) -> Vec<Field> {
    let mut combined = Vec::new();
    for (side, other) in [(left, right), (right, left)] {
        for field in &side.output_fields {
            let collides = other.output_fields.iter().any(|o| o.name == field.name);
            let mut out = field.clone();
            if collides {
                out.name = format!("{}_{}", field.name, side.title);
                out.display_name = if field.display_name.is_empty() {
                    out.name.clone()
                } else {
                    format!("{}_{}", field.display_name, side.title)
                };
            }
            combined.push(out);
        }
    }
    combined
}

impl SettingForm for JoinForm {
    fn kind(&self) -> NodeKind {
        NodeKind::Join
    }

    fn submit(&self, ctx: &FormContext<'_>, draft: &FormDraft) -> Result<FormOutcome, FormError> {
        let draft = match draft {
            FormDraft::Join(d) => d,
            other => return draft_mismatch(self.kind(), other),
        };

        let left = &ctx.inputs[0];
        let right = &ctx.inputs[1];

        let left_key = draft
            .left_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(FormError::MissingJoinKey)?;
        let right_key = draft
            .right_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(FormError::MissingJoinKey)?;

        let left_field = left
            .output_fields
            .iter()
            .find(|f| f.name == left_key)
            .ok_or_else(|| FormError::UnknownField {
                owner: left.id.clone(),
                name: left_key.to_string(),
            })?;
        let right_field = right
            .output_fields
            .iter()
            .find(|f| f.name == right_key)
            .ok_or_else(|| FormError::UnknownField {
                owner: right.id.clone(),
                name: right_key.to_string(),
            })?;

        if left_field.field_type != right_field.field_type {
            return Err(FormError::JoinKeyTypeMismatch {
                left: left_key.to_string(),
                left_type: left_field.field_type.clone(),
                right: right_key.to_string(),
                right_type: right_field.field_type.clone(),
            });
        }

        let combined = combined_fields(left, right);

        if draft.selected.is_empty() {
            return Err(FormError::EmptySelection);
        }
        for name in &draft.selected {
            if !combined.iter().any(|f| &f.name == name) {
                return Err(FormError::UnknownField {
                    owner: ctx.node.id.clone(),
                    name: name.clone(),
                });
            }
        }

        let output_fields: Vec<Field> = combined
            .into_iter()
            .filter(|f| draft.selected.contains(&f.name))
            .collect();

        Ok(FormOutcome::new(
            NodeConfig::Join(JoinConfig {
                join_type: draft.join_type,
                join_fields: vec![
                    JoinKey {
                        node_id: left.id.clone(),
                        field: left_key.to_string(),
                    },
                    JoinKey {
                        node_id: right.id.clone(),
                        field: right_key.to_string(),
                    },
                ],
                selected_fields: draft.selected.clone(),
            }),
            output_fields,
        ))
    }
}
