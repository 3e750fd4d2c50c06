//! OrderVoided event applier
//!
//! Marks the line voided with attribution and recomputes the subtotal.
//! The line itself is never removed.

use crate::sessions::money;
use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent};

/// OrderVoided applier
pub struct OrderVoidedApplier;

impl EventApplier for OrderVoidedApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::OrderVoided { line_id, .. } = &event.payload {
            let Some(session) = floor.session_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "OrderVoided without session, ignored");
                return;
            };
            let Some(line) = session.line_mut(line_id) else {
                tracing::warn!(line_id = %line_id, "OrderVoided for unknown line, ignored");
                return;
            };
            line.voided = true;
            line.voided_by = Some(event.operator.name.clone());
            line.voided_at = Some(event.timestamp);
            money::recalculate(session);
            session.updated_at = event.timestamp;
            super::finish(floor, event);
        }
    }
}
