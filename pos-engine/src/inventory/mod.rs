//! Multi-pool inventory.
//!
//! The ledger is the only shared mutable resource in the engine; every
//! stock mutation funnels through [`InventoryLedger::adjust`], which is the
//! single serialization point and the audit choke point. The yield
//! converter turns raw meat deliveries into service / by-product / waste
//! pool credits through the same ledger.

mod ledger;
mod yields;

pub use ledger::{AdjustContext, Adjustment, InventoryLedger, LedgerError};
pub use yields::{DeliveryRecord, YieldConverter, YieldError, YieldRecord};
