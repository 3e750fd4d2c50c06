//! Stock-mutation audit log.
//!
//! Every ledger adjustment lands here exactly once, attributed to the
//! operator who caused it. Entries sharing a group id render as one
//! collapsed transaction (one dish order → several ingredient deductions).

mod recorder;
mod types;

pub use recorder::AuditRecorder;
pub use types::{AuditEntry, AuditTransaction};
