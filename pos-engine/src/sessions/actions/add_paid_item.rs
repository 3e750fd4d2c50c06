//! AddPaidItem command handler
//!
//! Appends a paid dish or drink line. If the recipe catalog knows the
//! item, every ingredient is deducted from its declared source pool, all
//! under one group id per dish ordered.

use tracing::debug;

use crate::sessions::money;
use crate::sessions::traits::{CommandContext, CommandHandler, CommandMetadata, SessionError};
use shared::catalog::IngredientSource;
use shared::inventory::StockDelta;
use shared::session::{EventPayload, OrderKind, OrderLine, SessionEvent, SessionEventType};
use shared::util::short_id;

/// AddPaidItem action
#[derive(Debug, Clone)]
pub struct AddPaidItemAction {
    pub table_id: String,
    pub item_id: String,
    pub name: String,
    pub kind: OrderKind,
    pub quantity: i32,
    pub unit_price: f64,
}

impl CommandHandler for AddPaidItemAction {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        let (table, session) = ctx.occupied(&self.table_id)?;
        if !matches!(self.kind, OrderKind::Dish | OrderKind::Drink) {
            return Err(SessionError::InvalidOperation(format!(
                "paid items must be DISH or DRINK, got {:?}",
                self.kind
            )));
        }
        money::validate_quantity(self.quantity)?;
        money::validate_price(self.unit_price)?;

        let note = format!("{} x{} @ {}", self.name, self.quantity, table.label);
        let group_id = short_id();

        // Recipe-driven ingredient deductions; dishes without a recipe
        // deduct nothing.
        let mut stock_deltas = Vec::new();
        if let Some(recipe) = ctx.catalog.recipe(&self.item_id) {
            for ing in &recipe.ingredients {
                if ing.source == IngredientSource::Free {
                    continue;
                }
                let Some(item_id) = &ing.inventory_item_id else {
                    debug!(dish = %self.item_id, label = %ing.label, "Tracked ingredient without item id, skipping");
                    continue;
                };
                stock_deltas.push(StockDelta {
                    item_id: item_id.clone(),
                    item_name: ing.label.clone(),
                    category: match ing.source {
                        IngredientSource::MeatScrap => "kitchen".to_string(),
                        IngredientSource::Side => "side".to_string(),
                        IngredientSource::Pantry => "pantry".to_string(),
                        IngredientSource::Free => unreachable!("filtered above"),
                    },
                    delta: -(ing.qty * self.quantity as f64),
                    unit: ing.unit,
                    note: note.clone(),
                });
            }
        }

        let line = OrderLine {
            line_id: short_id(),
            kind: self.kind,
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
