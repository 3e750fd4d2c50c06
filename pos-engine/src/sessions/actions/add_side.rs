//! AddSide command handler
//!
//! Appends a manually ordered side line and deducts its stock.

use crate::sessions::money;
use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::inventory::StockDelta;
use shared::session::{EventPayload, OrderKind, OrderLine, SessionEvent, SessionEventType};
use shared::types::Unit;
use shared::util::short_id;

/// AddSide action
#[derive(Debug, Clone)]
pub struct AddSideAction {
    pub table_id: String,
    pub item_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

impl CommandHandler for AddSideAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let (table, session) = ctx.occupied(&self.table_id)?;
        money::validate_quantity(self.quantity)?;
        money::validate_price(self.unit_price)?;

        let note = format!("{} x{} @ {}", self.name, self.quantity, table.label);
        let group_id = short_id();

        let line = OrderLine {
            line_id: short_id(),
            kind: OrderKind::Side,
            item_id: self.item_id.clone(),
            name: self.name.clone(),
            quantity: self.quantity,
            weight_g: None,
            unit_price: self.unit_price,
            est_cost: 0.0,
            auto: false,
            package_id: None,
            merged_from: None,
            voided: false,
            voided_by: None,
            voided_at: None,
            added_by: metadata.operator.name.clone(),
            added_at: metadata.timestamp,
        };

        let stock_deltas = vec![StockDelta {
            item_id: self.item_id.clone(),
            item_name: self.name.clone(),
            category: "side".to_string(),
            delta: -(self.quantity as f64),
            unit: Unit::Pieces,
            note: note.clone(),
        }];

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
