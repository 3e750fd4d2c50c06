//! CloseSession command handler
//!
//! Settles the bill (subtotal − discount% + leftover penalty), records a
//! closed transaction for reporting, and frees the table.

use tracing::info;

use crate::sessions::money;
use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::session::{
    ClosedTransaction, EventPayload, PaymentMethod, SessionEvent, SessionEventType,
};

/// CloseSession action
#[derive(Debug, Clone)]
pub struct CloseSessionAction {
    pub table_id: String,
    pub method: PaymentMethod,
    pub discount_pct: f64,
    pub leftover_penalty: f64,
}

impl CommandHandler for CloseSessionAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let (table, session) = ctx.occupied(&self.table_id)?;
        money::validate_pct(self.discount_pct, "discount_pct")?;
        if !(self.leftover_penalty.is_finite() && self.leftover_penalty >= 0.0) {
            return Err(SessionError::InvalidOperation(format!(
                "leftover_penalty must be non-negative, got {}",
                self.leftover_penalty
            )));
        }

        let (discount_amount, total) =
            money::settle(session.subtotal, self.discount_pct, self.leftover_penalty);

        let closed = ClosedTransaction {
            session_id: session.session_id.clone(),
            table_id: self.table_id.clone(),
            table_label: table.label.clone(),
            persons: session.persons,
            subtotal: session.subtotal,
            discount_pct: self.discount_pct,
            discount_amount,
            leftover_penalty: self.leftover_penalty,
            total,
            method: self.method,
            merged_from: session.merged_from.clone(),
            opened_at: session.opened_at,
            closed_at: metadata.timestamp,
            closed_by: metadata.operator.name.clone(),
        };

        info!(
            table = %table.label,
            subtotal = closed.subtotal,
            discount = closed.discount_amount,
            penalty = closed.leftover_penalty,
            total = closed.total,
            method = %closed.method,
            "Session closed"
        );

        let seq = ctx.next_sequence();
        Ok(vec![SessionEvent::new(
            seq,
            self.table_id.clone(),
            session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::SessionClosed,
            EventPayload::SessionClosed { closed },
        )])
    }
}
