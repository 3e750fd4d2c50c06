//! PackageSelected event applier
//!
//! Removes the previous package's lines, installs the new package charge
//! and auto sides, and recomputes the subtotal.

use crate::sessions::money;
use crate::sessions::traits::EventApplier;
use shared::session::{EventPayload, FloorPlan, SessionEvent};

/// PackageSelected applier
pub struct PackageSelectedApplier;

impl EventApplier for PackageSelectedApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent) {
        if let EventPayload::PackageSelected {
            package_id,
            package_name,
            removed_line_ids,
            package_line,
            auto_lines,
            ..
        } = &event.payload
        {
            let Some(session) = floor.session_mut(&event.table_id) else {
                tracing::warn!(table_id = %event.table_id, "PackageSelected without session, ignored");
                return;
            };
            session
                .lines
                .retain(|l| !removed_line_ids.contains(&l.line_id));
            session.package_id = Some(package_id.clone());
            session.package_name = Some(package_name.clone());
            session.lines.push(package_line.clone());
            session.lines.extend(auto_lines.iter().cloned());
            money::recalculate(session);
            session.updated_at = event.timestamp;
            super::finish(floor, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::actions::SelectPackageAction;
    use crate::sessions::testutil::{metadata, seat, test_catalog, test_config, test_floor};
    use crate::sessions::traits::{CommandContext, CommandHandler};

    fn select(floor: &FloorPlan, package_id: &str, seq: u64) -> SessionEvent {
        let catalog = test_catalog();
        let config = test_config();
        let mut ctx = CommandContext::new(floor, &catalog, &config, seq);
        SelectPackageAction {
            table_id: "t1".to_string(),
            package_id: package_id.to_string(),
        }
        .execute(&mut ctx, &metadata())
        .unwrap()
        .remove(0)
    }

    #[test]
    fn test_apply_installs_package_and_sides() {
        let mut floor = test_floor();
        seat(&mut floor, "t1", "s1", 4);
        let event = select(&floor, "unli_pork", 0);
        PackageSelectedApplier.apply(&mut floor, &event);

        let session = floor.session("t1").unwrap();
        assert_eq!(session.package_id.as_deref(), Some("unli_pork"));
        // package line + 5 auto sides
        assert_eq!(session.lines.len(), 6);
        // ₱349 x 4
        assert_eq!(session.subtotal, 1396.0);
    }

    #[test]
    fn test_swap_preserves_manual_lines() {
        let mut floor = test_floor();
        seat(&mut floor, "t1", "s1", 4);
        let event = select(&floor, "unli_pork", 0);
        PackageSelectedApplier.apply(&mut floor, &event);

        // add a manual paid line between the two selections
        {
            let session = floor.session_mut("t1").unwrap();
            let mut manual = session.lines[0].clone();
            manual.line_id = "manual-1".to_string();
            manual.kind = shared::session::OrderKind::Dish;
            manual.auto = false;
            manual.package_id = None;
            manual.name = "Tteokbokki".to_string();
            manual.unit_price = 149.0;
            manual.quantity = 1;
            session.lines.push(manual);
            money::recalculate(session);
        }

        let event = select(&floor, "unli_premium", 1);
        PackageSelectedApplier.apply(&mut floor, &event);

        let session = floor.session("t1").unwrap();
        // premium package line + 3 auto sides + preserved manual line
        assert_eq!(session.lines.len(), 5);
        assert!(session.lines.iter().any(|l| l.line_id == "manual-1"));
        assert!(
            session
                .lines
                .iter()
                .filter(|l| l.auto || l.kind == shared::session::OrderKind::Package)
                .all(|l| l.package_id.as_deref() == Some("unli_premium"))
        );
        // ₱499 x 4 + ₱149
        assert_eq!(session.subtotal, 2145.0);
    }
}
