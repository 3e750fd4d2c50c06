//! SelectPackage command handler
//!
//! Replaces the session's package: removes the previous package line and
//! its auto-generated lines, inserts the new package charge and one auto
//! side line per included side (quantity = party size), and deducts each
//! side from stock under a single group id. Manually added lines and
//! voided lines are untouched.

use tracing::info;

use crate::sessions::money;
use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::inventory::StockDelta;
use shared::session::{EventPayload, OrderKind, OrderLine, SessionEvent, SessionEventType};
use shared::util::short_id;

/// SelectPackage action
#[derive(Debug, Clone)]
pub struct SelectPackageAction {
    pub table_id: String,
    pub package_id: String,
}

impl CommandHandler for SelectPackageAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let (table, session) = ctx.occupied(&self.table_id)?;
        let package = ctx
            .catalog
            .package(&self.package_id)
            .ok_or_else(|| SessionError::UnknownPackage(self.package_id.clone()))?;

        // Auto lines of the previous package go away; voided lines stay for
        // the audit trail, manual lines survive the swap.
        let removed_line_ids: Vec<String> = session
            .lines
            .iter()
            .filter(|l| !l.voided && (l.kind == OrderKind::Package || l.auto))
            .map(|l| l.line_id.clone())
            .collect();

        let persons = session.persons;
        let group_id = short_id();
        let note = format!("Package {} x{} @ {}", package.name, persons, table.label);

        let package_line = OrderLine {
            line_id: short_id(),
            kind: OrderKind::Package,
            item_id: package.package_id.clone(),
            name: package.name.clone(),
            quantity: 1,
            weight_g: None,
            unit_price: money::round_money(
                money::to_decimal(package.price_per_pax) * rust_decimal::Decimal::from(persons),
            ),
            est_cost: 0.0,
            auto: false,
            package_id: Some(package.package_id.clone()),
            merged_from: None,
            voided: false,
            voided_by: None,
            voided_at: None,
            added_by: metadata.operator.name.clone(),
            added_at: metadata.timestamp,
        };

        let mut auto_lines = Vec::with_capacity(package.sides.len());
        let mut stock_deltas = Vec::with_capacity(package.sides.len());
        for side in &package.sides {
            let quantity = side.qty_per_pax * persons;
            auto_lines.push(OrderLine {
                line_id: short_id(),
                kind: OrderKind::Side,
                item_id: side.item_id.clone(),
                name: side.name.clone(),
                quantity,
                weight_g: None,
                unit_price: 0.0,
                est_cost: 0.0,
                auto: true,
                package_id: Some(package.package_id.clone()),
                merged_from: None,
                voided: false,
                voided_by: None,
                voided_at: None,
                added_by: metadata.operator.name.clone(),
                added_at: metadata.timestamp,
            });
            stock_deltas.push(StockDelta {
                item_id: side.item_id.clone(),
                item_name: side.name.clone(),
                category: "side".to_string(),
                delta: -(quantity as f64),
                unit: side.unit,
                note: note.clone(),
            });
        }

        info!(
            table = %table.label,
            package = %package.name,
            persons,
            removed = removed_line_ids.len(),
            sides = auto_lines.len(),
            "Package selected"
        );

        let seq = ctx.next_sequence();
        Ok(vec![SessionEvent::new(
            seq,
            self.table_id.clone(),
            session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::PackageSelected,
            EventPayload::PackageSelected {
                package_id: package.package_id.clone(),
                package_name: package.name.clone(),
                removed_line_ids,
                package_line,
                auto_lines,
                stock_deltas,
                group_id,
            },
        )])
    }
}
