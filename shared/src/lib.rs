//! Shared domain types for the grill-house POS core.
//!
//! This crate holds the serializable vocabulary spoken between the engine
//! and its clients (floor tabs, reports, demos):
//!
//! - **catalog**: read-only reference data (packages, recipes, meat pools)
//! - **inventory**: stock movements, seeds, and levels
//! - **session**: commands, events, and floor/session snapshots
//! - **types**: actor attribution, units
//!
//! No engine logic lives here; everything is plain data with serde derives.

pub mod catalog;
pub mod inventory;
pub mod session;
pub mod types;
pub mod util;

// Re-export the types callers reach for constantly
pub use catalog::{Catalog, MeatCatalogEntry, PackageDef, RecipeDef};
pub use inventory::{SeedItem, StockDelta, StockLevel, StockMovement};
pub use session::{
    CommandError, CommandErrorCode, CommandPayload, CommandResponse, EventPayload, FloorPlan,
    OrderKind, OrderLine, Session, SessionCommand, SessionEvent, SessionEventType, Table,
    TableState,
};
pub use types::{Actor, Role, Unit};
