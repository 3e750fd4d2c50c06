//! OpenTable command handler
//!
//! Seats a new session on an available table.

use tracing::info;
use uuid::Uuid;

use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::session::{EventPayload, SessionEvent, SessionEventType};

/// OpenTable action
#[derive(Debug, Clone)]
pub struct OpenTableAction {
    pub table_id: String,
    pub persons: i32,
}

impl CommandHandler for OpenTableAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let table = ctx.available(&self.table_id)?;
        if self.persons < 1 {
            return Err(SessionError::InvalidOperation(format!(
                "party size must be at least 1, got {}",
                self.persons
            )));
        }

        let session_id = Uuid::new_v4().to_string();
        let seq = ctx.next_sequence();

        info!(
            table = %table.label,
            persons = self.persons,
            session_id = %session_id,
            "Table opened"
        );

        Ok(vec![SessionEvent::new(
            seq,
            self.table_id.clone(),
            session_id,
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::TableOpened,
            EventPayload::TableOpened {
                table_label: table.label.clone(),
                persons: self.persons,
            },
        )])
    }
}
