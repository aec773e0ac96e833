use super::{FormContext, FormDraft, FormOutcome, SettingForm, draft_mismatch};
use crate::definition::{NodeConfig, NodeKind, QueryType, ReferenceConfig, is_required_meta};
use crate::error::FormError;

/// Settings for a `view` node: pick (and optionally rename) fields from one
/// catalog view.
pub struct ReferenceForm;

impl SettingForm for ReferenceForm {
    fn kind(&self) -> NodeKind {
        NodeKind::View
    }

    fn submit(&self, ctx: &FormContext<'_>, draft: &FormDraft) -> Result<FormOutcome, FormError> {
        let draft = match draft {
            FormDraft::Reference(d) => d,
            other => return draft_mismatch(self.kind(), other),
        };

        let view_fields = ctx.catalog.view_fields(&draft.view_id)?;

        for pick in &draft.picks {
            if !view_fields.iter().any(|f| f.name == pick.name) {
                return Err(FormError::UnknownField {
                    owner: draft.view_id.clone(),
                    name: pick.name.clone(),
                });
            }
        }

        if ctx.query_type == QueryType::IndexBase {
            for field in &view_fields {
                if !is_required_meta(&field.name) {
                    continue;
                }
                let selected = draft
                    .picks
                    .iter()
                    .any(|p| p.name == field.name && p.selected);
                if !selected {
                    return Err(FormError::RequiredFieldDeselected(field.name.clone()));
                }
            }
        }

        // Outputs keep the catalog's field order regardless of pick order.
        let mut output_fields = Vec::new();
        for field in &view_fields {
            let Some(pick) = draft
                .picks
                .iter()
                .find(|p| p.name == field.name && p.selected)
            else {
                continue;
            };
            let mut out = field.clone();
            if out.original_name.is_empty() {
                out.original_name = field.name.clone();
            }
            match &pick.display_name {
                Some(display) => out.display_name = display.clone(),
                None if out.display_name.is_empty() => out.display_name = field.name.clone(),
                None => {}
            }
            output_fields.push(out);
        }

        if output_fields.is_empty() {
            return Err(FormError::EmptySelection);
        }

        Ok(FormOutcome::new(
            NodeConfig::Reference(ReferenceConfig {
                view_id: draft.view_id.clone(),
                fields: draft.picks.clone(),
            }),
            output_fields,
        ))
    }
}
