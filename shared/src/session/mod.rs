//! Table-session types: commands in, events out, snapshots in between.
//!
//! Mirrors the engine's command flow:
//!
//! ```text
//! SessionCommand ──▶ SessionManager ──▶ SessionEvent ──▶ FloorPlan update
//!                          │                  │
//!                     CommandResponse    Broadcast to replicas
//! ```

pub mod command;
pub mod event;
pub mod snapshot;
pub mod types;

pub use command::{CommandPayload, SessionCommand};
pub use event::{EventPayload, SessionEvent, SessionEventType};
pub use snapshot::{FloorPlan, Session, Table, TableState};
pub use types::{
    ClosedTransaction, CommandError, CommandErrorCode, CommandResponse, OrderKind, OrderLine,
    PaymentMethod,
};
