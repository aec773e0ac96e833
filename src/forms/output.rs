use super::{FormContext, FormDraft, FormOutcome, SettingForm, draft_mismatch};
use crate::definition::{Field, NodeConfig, NodeKind, OutputConfig, QueryType, is_required_meta};
use crate::error::FormError;

/// Settings for an `output` node: the final published subset of its single
/// upstream node's fields.
pub struct OutputForm;

impl SettingForm for OutputForm {
    fn kind(&self) -> NodeKind {
        NodeKind::Output
    }

    fn submit(&self, ctx: &FormContext<'_>, draft: &FormDraft) -> Result<FormOutcome, FormError> {
        let draft = match draft {
            FormDraft::Output(d) => d,
            other => return draft_mismatch(self.kind(), other),
        };

        let upstream = &ctx.inputs[0];

        if draft.selected.is_empty() {
            return Err(FormError::EmptySelection);
        }
        for name in &draft.selected {
            if !upstream.output_fields.iter().any(|f| &f.name == name) {
                return Err(FormError::UnknownField {
                    owner: upstream.id.clone(),
                    name: name.clone(),
                });
            }
        }

        if ctx.query_type == QueryType::IndexBase {
            for field in &upstream.output_fields {
                if is_required_meta(&field.name) && !draft.selected.contains(&field.name) {
                    return Err(FormError::RequiredFieldDeselected(field.name.clone()));
                }
            }
        }

        let output_fields: Vec<Field> = upstream
            .output_fields
            .iter()
            .filter(|f| draft.selected.contains(&f.name))
            .cloned()
            .collect();

        Ok(FormOutcome::new(
            NodeConfig::Output(OutputConfig {
                selected_fields: draft.selected.clone(),
            }),
            output_fields,
        ))
    }
}
