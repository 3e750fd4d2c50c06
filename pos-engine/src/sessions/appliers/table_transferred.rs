//! TableTransferred event applier
//!
//! Moves the session object to the target table and frees the source.

use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent, TableState};

/// TableTransferred applier
pub struct TableTransferredApplier;

impl EventApplier for TableTransferredApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::TableTransferred {
            target_table_id, ..
        } = &event.payload
        {
            // Check the destination before touching the source
            match floor.table(target_table_id) {
                Some(t) if t.state.is_available() => {}
                Some(_) => {
                    tracing::warn!(target = %target_table_id, "TableTransferred into occupied table, ignored");
                    return;
                }
                None => {
                    tracing::warn!(target = %target_table_id, "TableTransferred to unknown table, ignored");
                    return;
                }
            }
            let Some(mut session) = floor
                .table_mut(&event.table_id)
                .and_then(|t| t.state.take_session())
            else {
                tracing::warn!(table_id = %event.table_id, "TableTransferred without session, ignored");
                return;
            };
            session.updated_at = event.timestamp;
            if let Some(target) = floor.table_mut(target_table_id) {
                target.state = TableState::Occupied { session };
            }
            super::finish(floor, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::testutil::{seat, test_floor};
    use shared::session::SessionEventType;
    use shared::types::Actor;

    fn transferred_event(source: &str, target: &str) -> SessionEvent {
        SessionEvent::new(
            1,
            source.to_string(),
            "s1".to_string(),
            Actor::staff("Ana"),
            "cmd-1".to_string(),
            None,
            SessionEventType::TableTransferred,
            EventPayload::TableTransferred {
                target_table_id: target.to_string(),
                target_label: "T3".to_string(),
                authorized_by: Some("Marco".to_string()),
            },
        )
    }

    #[test]
    fn test_apply_moves_session() {
        let mut floor = test_floor();
        seat(&mut floor, "t1", "s1", 4);

        TableTransferredApplier.apply(&mut floor, &transferred_event("t1", "t3"));

        assert!(floor.table("t1").unwrap().state.is_available());
        let session = floor.session("t3").unwrap();
        assert_eq!(session.session_id, "s1");
        assert_eq!(session.persons, 4);
    }

    #[test]
    fn test_apply_into_occupied_target_is_noop() {
        let mut floor = test_floor();
        seat(&mut floor, "t1", "s1", 4);
        seat(&mut floor, "t3", "s3", 2);

        TableTransferredApplier.apply(&mut floor, &transferred_event("t1", "t3"));

        // both sessions untouched
        assert_eq!(floor.session("t1").unwrap().session_id, "s1");
        assert_eq!(floor.session("t3").unwrap().session_id, "s3");
    }
}
