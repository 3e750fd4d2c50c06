//! OrdersAdded event applier
//!
//! Appends the new lines and recomputes the subtotal.

use crate::sessions::money;
use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent};

/// OrdersAdded applier
pub struct OrdersAddedApplier;

impl EventApplier for OrdersAddedApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::OrdersAdded { lines, .. } = &event.payload {
            let Some(session) = floor.session_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "OrdersAdded without session, ignored");
                return;
            };
            session.lines.extend(lines.iter().cloned());
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

    fn added_event(lines: Vec<OrderLine>) -> SessionEvent {
        SessionEvent::new(
            1,
            "t1".to_string(),
            "s1".to_string(),
            Actor::staff("Ana"),
            "cmd-1".to_string(),
            None,
            SessionEventType::OrdersAdded,
            EventPayload::OrdersAdded {
                lines,
                stock_deltas: vec![],
                group_id: "g1".to_string(),
            },
        )
    }

    fn paid_line(line_id: &str, price: f64, qty: i32) -> OrderLine {
        OrderLine {
            line_id: line_id.to_string(),
            kind: OrderKind::Dish,
            item_id: "dish".to_string(),
            name: "Dish".to_string(),
            quantity: qty,
            weight_g: None,
            unit_price: price,
            est_cost: 0.0,
            auto: false,
            package_id: None,
            merged_from: None,
            voided: false,
            voided_by: None,
            voided_at: None,
            added_by: "Ana".to_string(),
            added_at: 0,
        }
    }

    #[test]
    fn test_apply_appends_and_retotals() {
        let mut floor = test_floor();
        seat(&mut floor, "t1", "s1", 4);
        OrdersAddedApplier.apply(
            &mut floor,
            &added_event(vec![paid_line("a", 149.0, 1), paid_line("b", 99.0, 2)]),
        );

        let session = floor.session("t1").unwrap();
        assert_eq!(session.lines.len(), 2);
        assert_eq!(session.subtotal, 347.0);
    }

    #[test]
    fn test_apply_without_session_is_noop() {
        let mut floor = test_floor();
        OrdersAddedApplier.apply(&mut floor, &added_event(vec![paid_line("a", 149.0, 1)]));
        assert!(floor.session("t1").is_none());
    }
}
