//! TableOpened event applier
//!
//! Seats a new session on the table.

use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, Session, SessionEvent, TableState};

/// TableOpened applier
pub struct TableOpenedApplier;

impl EventApplier for TableOpenedApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::TableOpened { persons, .. } = &event.payload {
            let Some(table) = floor.table_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "TableOpened for unknown table, ignored");
                return;
            };
            if !table.state.is_available() {
                tracing::warn!(table_id = %event.table_id, "TableOpened on occupied table, ignored");
                return;
            }
            table.state = TableState::Occupied {
                session: Session::new(event.session_id.clone(), *persons, event.timestamp),
            };
            super::finish(floor, event);
        }
    }
}
