//! VoidOrder command handler
//!
//! Marks one line voided. The record stays in the session for audit;
//! inventory is NOT reversed - voiding affects billing, not stock.

use tracing::info;

use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::session::{EventPayload, SessionEvent, SessionEventType};

/// VoidOrder action
#[derive(Debug, Clone)]
pub struct VoidOrderAction {
    pub table_id: String,
    pub line_id: String,
    pub reason: Option<String>,
}

impl CommandHandler for VoidOrderAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let (table, session) = ctx.occupied(&self.table_id)?;
        let line = session
            .line(&self.line_id)
            .ok_or_else(|| SessionError::LineNotFound(self.line_id.clone()))?;
        if line.voided {
            return Err(SessionError::LineAlreadyVoided(self.line_id.clone()));
        }

        info!(
            table = %table.label,
            line = %line.name,
            amount = line.line_total(),
            reason = ?self.reason,
            authorized_by = ?metadata.authorized_by,
            "Order voided"
        );

        let seq = ctx.next_sequence();
        Ok(vec![SessionEvent::new(
            seq,
            self.table_id.clone(),
            session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::OrderVoided,
            EventPayload::OrderVoided {
                line_id: self.line_id.clone(),
                line_name: line.name.clone(),
                reason: self.reason.clone(),
                authorized_by: metadata.authorized_by.clone(),
            },
        )])
    }
}
