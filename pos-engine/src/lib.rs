//! Grill-house POS core - authoritative table-session and inventory engine
//!
//! # 架构概述
//!
//! One engine process owns the floor state; every tab is a thin client
//! issuing commands and receiving pushed updates. Core pieces:
//!
//! - **sessions**: table-session state machine (command → action → event →
//!   applier pipeline)
//! - **inventory**: multi-pool ledger and raw-delivery yield conversion
//! - **audit**: user-attributed, groupable log of every stock mutation
//! - **approval**: two-step manager authorization for privileged commands
//! - **sync**: committed-state broadcast to floor tabs with echo suppression
//! - **store**: snapshot persistence boundary (host-provided)
//!
//! # 模块结构
//!
//! ```text
//! pos-engine/src/
//! ├── config.rs      # engine tunables, env overrides
//! ├── sessions/      # manager, actions, appliers, money
//! ├── inventory/     # ledger, yield converter
//! ├── audit/         # recorder, grouped view
//! ├── approval/      # gate, tokens
//! ├── sync/          # bus, tab replicas
//! ├── store/         # snapshot store trait + memory impl
//! └── reports.rs     # sales / yield read models
//! ```

pub mod approval;
pub mod audit;
pub mod config;
pub mod inventory;
pub mod logging;
pub mod reports;
pub mod sessions;
pub mod store;
pub mod sync;

// Re-export 公共类型
pub use approval::{ApprovalGate, ApprovalOutcome, ApprovalToken};
pub use audit::AuditRecorder;
pub use config::{EngineConfig, StockPolicy};
pub use inventory::{InventoryLedger, YieldConverter};
pub use sessions::SessionManager;
pub use store::{MemoryStore, SnapshotStore};
pub use sync::{StateUpdate, SyncBus, TabReplica};

// Re-export the shared wire types alongside the engine
pub use shared::session::{CommandPayload, CommandResponse, SessionCommand, SessionEvent};
