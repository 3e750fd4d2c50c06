//! TableVoided event applier
//!
//! Frees the table. The void log lives in the event payload and the audit
//! trail; inventory is not reversed.

use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent};

/// TableVoided applier
pub struct TableVoidedApplier;

impl EventApplier for TableVoidedApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::TableVoided { .. } = &event.payload {
            let Some(table) = floor.table_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "TableVoided for unknown table, ignored");
                return;
            };
            table.state.take_session();
            super::finish(floor, event);
        }
    }
}
