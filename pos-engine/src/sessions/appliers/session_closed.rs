//! SessionClosed event applier
//!
//! Frees the table after checkout. The closed-transaction record travels
//! in the event; the manager appends it to the closed log.

use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent};

/// SessionClosed applier
pub struct SessionClosedApplier;

impl EventApplier for SessionClosedApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::SessionClosed { .. } = &event.payload {
            let Some(table) = floor.table_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "SessionClosed for unknown table, ignored");
                return;
            };
            table.state.take_session();
            super::finish(floor, event);
        }
    }
}
