//! MergeTable command handler
//!
//! Moves one occupied table's session into another occupied table's:
//! persons are unioned, lines concatenated with provenance, the source
//! label appended to the target's merged-from list, and the source table
//! freed. Generates two events:
//! - TableMergedOut for the source table
//! - TableMerged for the target table

use tracing::info;

use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::session::{EventPayload, SessionEvent, SessionEventType};

/// MergeTable action
#[derive(Debug, Clone)]
pub struct MergeTableAction {
    pub source_table_id: String,
    pub target_table_id: String,
}

impl CommandHandler for MergeTableAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        if self.source_table_id == self.target_table_id {
            return Err(SessionError::InvalidOperation(
                "cannot merge a table into itself".to_string(),
            ));
        }
        let (source_table, source_session) = ctx.occupied(&self.source_table_id)?;
        let (target_table, target_session) = ctx.occupied(&self.target_table_id)?;

        // Carried lines are tagged with where they came from
        let mut lines = source_session.lines.clone();
        for line in &mut lines {
            line.merged_from = Some(source_table.label.clone());
        }

        info!(
            source = %source_table.label,
            target = %target_table.label,
            persons_added = source_session.persons,
            lines = lines.len(),
            authorized_by = ?metadata.authorized_by,
            "Tables merged"
        );

        let seq1 = ctx.next_sequence();
        let seq2 = ctx.next_sequence();

        let event1 = SessionEvent::new(
            seq1,
            self.source_table_id.clone(),
            source_session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::TableMergedOut,
            EventPayload::TableMergedOut {
                target_table_id: self.target_table_id.clone(),
                target_label: target_table.label.clone(),
                authorized_by: metadata.authorized_by.clone(),
            },
        );

        let event2 = SessionEvent::new(
            seq2,
            self.target_table_id.clone(),
            target_session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::TableMerged,
            EventPayload::TableMerged {
                source_table_id: self.source_table_id.clone(),
                source_label: source_table.label.clone(),
                persons_added: source_session.persons,
                lines,
                authorized_by: metadata.authorized_by.clone(),
            },
        );

        Ok(vec![event1, event2])
    }
}
