//! VoidTable command handler
//!
//! Writes a void-log entry for every active priced line, then frees the
//! table. Inventory is not reversed.

use tracing::info;

use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::session::event::VoidedLine;
use shared::session::{EventPayload, SessionEvent, SessionEventType};

/// VoidTable action
#[derive(Debug, Clone)]
pub struct VoidTableAction {
    pub table_id: String,
    pub reason: Option<String>,
}

impl CommandHandler for VoidTableAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let (table, session) = ctx.occupied(&self.table_id)?;

        let voided_lines: Vec<VoidedLine> = session
            .active_lines()
            .filter(|l| l.unit_price > 0.0)
            .map(|l| VoidedLine {
                line_id: l.line_id.clone(),
                name: l.name.clone(),
                amount: l.line_total(),
            })
            .collect();

        info!(
            table = %table.label,
            voided = voided_lines.len(),
            reason = ?self.reason,
            authorized_by = ?metadata.authorized_by,
            "Table voided"
        );

        let seq = ctx.next_sequence();
        Ok(vec![SessionEvent::new(
            seq,
            self.table_id.clone(),
            session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::TableVoided,
            EventPayload::TableVoided {
                voided_lines,
                reason: self.reason.clone(),
                authorized_by: metadata.authorized_by.clone(),
            },
        )])
    }
}
