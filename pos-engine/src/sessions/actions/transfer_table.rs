//! TransferTable command handler
//!
//! Moves the whole session to an available table; the source is freed.

use tracing::info;

use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::session::{EventPayload, SessionEvent, SessionEventType};

/// TransferTable action
#[derive(Debug, Clone)]
pub struct TransferTableAction {
    pub source_table_id: String,
    pub target_table_id: String,
}

impl CommandHandler for TransferTableAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        if self.source_table_id == self.target_table_id {
            return Err(SessionError::InvalidOperation(
                "cannot transfer a table onto itself".to_string(),
            ));
        }
        let (source_table, session) = ctx.occupied(&self.source_table_id)?;
        let target_table = ctx.available(&self.target_table_id)?;

        info!(
            source = %source_table.label,
            target = %target_table.label,
            session_id = %session.session_id,
            authorized_by = ?metadata.authorized_by,
            "Table transferred"
        );

        let seq = ctx.next_sequence();
        Ok(vec![SessionEvent::new(
            seq,
            self.source_table_id.clone(),
            session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::TableTransferred,
            EventPayload::TableTransferred {
                target_table_id: self.target_table_id.clone(),
                target_label: target_table.label.clone(),
                authorized_by: metadata.authorized_by.clone(),
            },
        )])
    }
}
