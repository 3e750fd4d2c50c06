//! ChangePax command handler
//!
//! Updates the party size. Already-placed package auto lines are NOT
//! rescaled retroactively.

use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::session::{EventPayload, SessionEvent, SessionEventType};

/// ChangePax action
#[derive(Debug, Clone)]
pub struct ChangePaxAction {
    pub table_id: String,
    pub persons: i32,
}

impl CommandHandler for ChangePaxAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let (_table, session) = ctx.occupied(&self.table_id)?;
        if self.persons < 1 {
            return Err(SessionError::InvalidOperation(format!(
                "party size must be at least 1, got {}",
                self.persons
            )));
        }

        let seq = ctx.next_sequence();
        Ok(vec![SessionEvent::new(
            seq,
            self.table_id.clone(),
            session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::PaxChanged,
            EventPayload::PaxChanged {
                persons: self.persons,
                previous: session.persons,
            },
        )])
    }
}
