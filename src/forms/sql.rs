use super::{FormContext, FormDraft, FormOutcome, SettingForm, draft_mismatch};
use crate::definition::{NodeConfig, NodeKind, SqlConfig};
use crate::error::FormError;
use crate::sql::scan_placeholders;

/// Settings for a `sql` node: free text referencing upstream nodes through
/// `{{.nodeId}}` placeholders.
///
/// The output schema is intentionally left empty — static analysis of
/// arbitrary SQL is out of scope, so the backend resolves it on preview.
pub struct SqlForm;

impl SettingForm for SqlForm {
    fn kind(&self) -> NodeKind {
        NodeKind::Sql
    }

    fn submit(&self, ctx: &FormContext<'_>, draft: &FormDraft) -> Result<FormOutcome, FormError> {
        let draft = match draft {
            FormDraft::Sql(d) => d,
            other => return draft_mismatch(self.kind(), other),
        };

        for placeholder in scan_placeholders(&draft.sql_expression) {
            let known = placeholder.node_id != ctx.node.id
                && ctx.node_ids.contains(&placeholder.node_id);
            if !known {
                return Err(FormError::UnknownPlaceholder(placeholder.node_id));
            }
        }

        Ok(FormOutcome::new(
            NodeConfig::Sql(SqlConfig {
                sql_expression: draft.sql_expression.clone(),
            }),
            Vec::new(),
        ))
    }
}
