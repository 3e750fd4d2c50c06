//! PaxChanged event applier
//!
//! Updates the party size. Auto lines placed earlier keep their
//! quantities.

use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent};

/// PaxChanged applier
pub struct PaxChangedApplier;

impl EventApplier for PaxChangedApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::PaxChanged { persons, .. } = &event.payload {
            let Some(session) = floor.session_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "PaxChanged without session, ignored");
                return;
            };
            session.persons = *persons;
            session.updated_at = event.timestamp;
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

    #[test]
    fn test_apply_updates_persons_only() {
        let mut floor = test_floor();
        seat(&mut floor, "t1", "s1", 4);
        let event = SessionEvent::new(
            1,
            "t1".to_string(),
            "s1".to_string(),
            Actor::staff("Ana"),
            "cmd-1".to_string(),
            None,
            SessionEventType::PaxChanged,
            EventPayload::PaxChanged {
                persons: 6,
                previous: 4,
            },
        );
        PaxChangedApplier.apply(&mut floor, &event);
        assert_eq!(floor.session("t1").unwrap().persons, 6);
    }
}
