//! AddMeat command handler
//!
//! Appends a zero-price, weight-based meat line (included with the
//! package) and deducts the grams from the meat's service pool. The
//! "basic" meat stock view is a read-time rollup over the meat's pools, so
//! a single deduction keeps every view consistent.

use tracing::info;

use crate::sessions::money;
use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::inventory::StockDelta;
use shared::session::{EventPayload, OrderKind, OrderLine, SessionEvent, SessionEventType};
use shared::types::Unit;
use shared::util::short_id;

/// AddMeat action
#[derive(Debug, Clone)]
pub struct AddMeatAction {
    pub table_id: String,
    pub meat_id: String,
    pub grams: f64,
}

impl CommandHandler for AddMeatAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let (table, session) = ctx.occupied(&self.table_id)?;
        let meat = ctx
            .catalog
            .meat(&self.meat_id)
            .ok_or_else(|| SessionError::UnknownMeat(self.meat_id.clone()))?;
        money::validate_weight(self.grams)?;

        // Included meat rides on the selected package
        let package_id = session
            .package_id
            .clone()
            .ok_or_else(|| SessionError::NoPackageSelected(table.label.clone()))?;
        let package = ctx
            .catalog
            .package(&package_id)
            .ok_or_else(|| SessionError::UnknownPackage(package_id.clone()))?;
        if !package.eligible_meats.contains(&self.meat_id) {
            return Err(SessionError::MeatNotEligible {
                meat: self.meat_id.clone(),
                package: package.name.clone(),
            });
        }

        let est_cost = money::meat_cost(self.grams, meat.cost_per_100g);
        let note = format!("{} {:.0}g @ {}", meat.name, self.grams, table.label);
        let group_id = short_id();

        let line = OrderLine {
            line_id: short_id(),
            kind: OrderKind::Meat,
            item_id: meat.meat_id.clone(),
            name: meat.name.clone(),
            quantity: 1,
            weight_g: Some(self.grams),
            unit_price: 0.0,
            est_cost,
            auto: true,
            package_id: Some(package_id),
            merged_from: None,
            voided: false,
            voided_by: None,
            voided_at: None,
            added_by: metadata.operator.name.clone(),
            added_at: metadata.timestamp,
        };

        let stock_deltas = vec![StockDelta {
            item_id: meat.service_pool.clone(),
            item_name: meat.name.clone(),
            category: "meat".to_string(),
            delta: -self.grams,
            unit: Unit::Grams,
            note: note.clone(),
        }];

        info!(
            table = %table.label,
            meat = %meat.name,
            grams = self.grams,
            est_cost,
            "Meat added"
        );

        let seq = ctx.next_sequence();
        Ok(vec![SessionEvent::new(
            seq,
            self.table_id.clone(),
            session.session_id.clone(),
            metadata.operator.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            SessionEventType::OrdersAdded,
            EventPayload::OrdersAdded {
                lines: vec![line],
                stock_deltas,
                group_id,
            },
        )])
    }
}
