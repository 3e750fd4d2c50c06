//! TableMergedOut event applier
//!
//! Frees the source table of a merge. The session content travels in the
//! companion TableMerged event, so nothing is copied here.

use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent};

/// TableMergedOut applier
pub struct TableMergedOutApplier;

impl EventApplier for TableMergedOutApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::TableMergedOut { .. } = &event.payload {
            let Some(table) = floor.table_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "TableMergedOut for unknown table, ignored");
                return;
            };
            table.state.take_session();
            super::finish(floor, event);
        }
    }
}
