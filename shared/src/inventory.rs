//! Inventory wire types: deductions carried on session events, per-item
//! movement history, and seed/level views.

use serde::{Deserialize, Serialize};

use crate::types::Unit;

/// One pending stock adjustment, computed by a command action and applied
/// by the engine through the ledger after the event commits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockDelta {
    /// Ledger item id (a pool id for meats)
    pub item_id: String,
    pub item_name: String,
    /// Audit category ("side", "meat", "pantry", "raw", ...)
    pub category: String,
    /// Signed quantity; deductions are negative
    pub delta: f64,
    pub unit: Unit,
    pub note: String,
}

/// One applied adjustment in an item's bounded history ring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMovement {
    pub delta: f64,
    pub note: String,
    /// Unix milliseconds
    pub at: i64,
    pub before: f64,
    pub after: f64,
    pub actor_name: String,
    /// Links movements created by one logical transaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Optional attachment reference (delivery photo, spoilage photo)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Initial stock for one ledger item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub unit: Unit,
    pub quantity: f64,
}

/// Read view of one item's current level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockLevel {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub unit: Unit,
    pub quantity: f64,
}
