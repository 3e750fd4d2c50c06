//! Session commands - the engine's only write surface.

use serde::{Deserialize, Serialize};

use crate::types::Actor;
use crate::util::now_millis;

use super::types::PaymentMethod;

/// A command issued by a floor tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCommand {
    /// Unique command ID for idempotent retries
    pub command_id: String,
    pub operator: Actor,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Redeemable approval token for privileged commands issued by staff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_token: Option<String>,
    pub payload: CommandPayload,
}

impl SessionCommand {
    pub fn new(operator: Actor, payload: CommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            operator,
            timestamp: now_millis(),
            approval_token: None,
            payload,
        }
    }

    pub fn with_approval(mut self, token: impl Into<String>) -> Self {
        self.approval_token = Some(token.into());
        self
    }
}

/// Command payload variants, one per table operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandPayload {
    OpenTable {
        table_id: String,
        persons: i32,
    },
    SelectPackage {
        table_id: String,
        package_id: String,
    },
    AddMeat {
        table_id: String,
        meat_id: String,
        grams: f64,
    },
    AddSide {
        table_id: String,
        item_id: String,
        name: String,
        quantity: i32,
        unit_price: f64,
    },
    AddPaidItem {
        table_id: String,
        item_id: String,
        name: String,
        /// DISH or DRINK
        kind: super::types::OrderKind,
        quantity: i32,
        unit_price: f64,
    },
    VoidOrder {
        table_id: String,
        line_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    ChangePax {
        table_id: String,
        persons: i32,
    },
    MergeTable {
        source_table_id: String,
        target_table_id: String,
    },
    TransferTable {
        source_table_id: String,
        target_table_id: String,
    },
    VoidTable {
        table_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    CloseSession {
        table_id: String,
        method: PaymentMethod,
        /// Percentage 0-100 applied to the subtotal
        discount_pct: f64,
        /// Flat surcharge for unconsumed grilled meat beyond the allowance
        leftover_penalty: f64,
    },
}

impl CommandPayload {
    /// Privileged commands need a manager: either a Manager-role operator or
    /// a redeemed approval token.
    pub fn is_privileged(&self) -> bool {
        matches!(
            self,
            CommandPayload::VoidOrder { .. }
                | CommandPayload::MergeTable { .. }
                | CommandPayload::TransferTable { .. }
                | CommandPayload::VoidTable { .. }
        )
    }

    /// Human label for approval prompts and logs.
    pub fn describe(&self) -> &'static str {
        match self {
            CommandPayload::OpenTable { .. } => "open table",
            CommandPayload::SelectPackage { .. } => "select package",
            CommandPayload::AddMeat { .. } => "add meat",
            CommandPayload::AddSide { .. } => "add side",
            CommandPayload::AddPaidItem { .. } => "add paid item",
            CommandPayload::VoidOrder { .. } => "void order",
            CommandPayload::ChangePax { .. } => "change pax",
            CommandPayload::MergeTable { .. } => "merge table",
            CommandPayload::TransferTable { .. } => "transfer table",
            CommandPayload::VoidTable { .. } => "void table",
            CommandPayload::CloseSession { .. } => "close session",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privileged_commands() {
        let void = CommandPayload::VoidOrder {
            table_id: "t1".to_string(),
            line_id: "l1".to_string(),
            reason: None,
        };
        let open = CommandPayload::OpenTable {
            table_id: "t1".to_string(),
            persons: 2,
        };
        assert!(void.is_privileged());
        assert!(!open.is_privileged());
    }

    #[test]
    fn test_command_ids_are_unique() {
        let a = SessionCommand::new(
            Actor::staff("Ana"),
            CommandPayload::OpenTable {
                table_id: "t1".to_string(),
                persons: 2,
            },
        );
        let b = SessionCommand::new(
            Actor::staff("Ana"),
            CommandPayload::OpenTable {
                table_id: "t2".to_string(),
                persons: 2,
            },
        );
        assert_ne!(a.command_id, b.command_id);
    }
}
