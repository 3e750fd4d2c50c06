//! TableMerged event applier
//!
//! Folds the source session into the target: persons are unioned, carried
//! lines appended, and the source label recorded in merged-from.

use crate::sessions::money;
use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent};

/// TableMerged applier
pub struct TableMergedApplier;

impl EventApplier for TableMergedApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::TableMerged {
            source_label,
            persons_added,
            lines,
            ..
        } = &event.payload
        {
            let Some(session) = floor.session_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "TableMerged without session, ignored");
                return;
            };
            session.persons += persons_added;
            session.lines.extend(lines.iter().cloned());
            session.merged_from.push(source_label.clone());
            money::recalculate(session);
            session.updated_at = event.timestamp;
            super::finish(floor, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::testutil::{seat, test_floor};
    use shared::session::{OrderKind, OrderLine, SessionEventType};
    use shared::types::Actor;

    fn carried_line(price: f64) -> OrderLine {
        OrderLine {
            line_id: "carried-1".to_string(),
            kind: OrderKind::Dish,
            item_id: "dish".to_string(),
            name: "Dish".to_string(),
            quantity: 1,
            weight_g: None,
            unit_price: price,
            est_cost: 0.0,
            auto: false,
            package_id: None,
            merged_from: Some("T2".to_string()),
            voided: false,
            voided_by: None,
            voided_at: None,
            added_by: "Ana".to_string(),
            added_at: 0,
        }
    }

    #[test]
    fn test_apply_unions_sessions() {
        let mut floor = test_floor();
        seat(&mut floor, "t1", "s1", 4);
        floor.session_mut("t1").unwrap().subtotal = 0.0;

        let event = SessionEvent::new(
            2,
            "t1".to_string(),
            "s1".to_string(),
            Actor::staff("Ana"),
            "cmd-1".to_string(),
            None,
            SessionEventType::TableMerged,
            EventPayload::TableMerged {
                source_table_id: "t2".to_string(),
                source_label: "T2".to_string(),
                persons_added: 2,
                lines: vec![carried_line(400.0)],
                authorized_by: Some("Marco".to_string()),
            },
        );
        TableMergedApplier.apply(&mut floor, &event);

        let session = floor.session("t1").unwrap();
        assert_eq!(session.persons, 6);
        assert_eq!(session.lines.len(), 1);
        assert_eq!(session.merged_from, vec!["T2".to_string()]);
        assert_eq!(session.subtotal, 400.0);
        assert_eq!(session.lines[0].merged_from.as_deref(), Some("T2"));
    }
}
