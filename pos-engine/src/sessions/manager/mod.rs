//! SessionManager - command processing and event generation
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Approval check for privileged commands
//!     ├─ 3. Convert command to action and execute (events)
//!     ├─ 4. Stock pre-flight (reject policy only)
//!     ├─ 5. Apply events to the floor via EventApplier
//!     ├─ 6. Apply stock deltas through the ledger (one audit entry each)
//!     ├─ 7. Mark command processed, persist snapshots
//!     ├─ 8. Broadcast event(s) and sync updates
//!     └─ 9. Return response
//! ```
//!
//! The whole pipeline runs under one state lock: the floor is only ever
//! mutated here, so commands serialize exactly like UI events in the
//! original single-threaded loop.

mod error;
pub use error::*;

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use shared::catalog::Catalog;
use shared::session::{
    ClosedTransaction, CommandResponse, EventPayload, FloorPlan, Session, SessionCommand,
    SessionEvent,
};

use crate::approval::ApprovalGate;
use crate::config::{EngineConfig, StockPolicy};
use crate::inventory::{AdjustContext, InventoryLedger};
use crate::store::SnapshotStore;
use crate::sync::{StateUpdate, SyncBus};

use super::actions::CommandAction;
use super::appliers::EventAction;
use super::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier};

/// Persistence keys for the manager's slices.
const FLOOR_KEY: &str = "floor";
const CLOSED_KEY: &str = "closed";
const PROCESSED_KEY: &str = "processed";

/// Origin id the engine publishes under.
const ENGINE_ORIGIN: &str = "engine";

#[derive(Debug, Default)]
struct EngineState {
    floor: FloorPlan,
    processed: HashSet<String>,
    closed: Vec<ClosedTransaction>,
}

/// The authoritative table-session engine.
///
/// The `epoch` is a unique id generated on each startup; replicas use it
/// to detect engine restarts and trigger a full resync.
pub struct SessionManager {
    state: RwLock<EngineState>,
    catalog: Arc<Catalog>,
    ledger: Arc<InventoryLedger>,
    approval: Arc<ApprovalGate>,
    config: EngineConfig,
    event_tx: broadcast::Sender<SessionEvent>,
    sync: SyncBus,
    store: RwLock<Option<Arc<dyn SnapshotStore>>>,
    epoch: String,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("epoch", &self.epoch)
            .field("tables", &self.state.read().floor.tables.len())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(
        floor: FloorPlan,
        catalog: Arc<Catalog>,
        ledger: Arc<InventoryLedger>,
        approval: Arc<ApprovalGate>,
        config: EngineConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(config.channel_capacity);
        let sync = SyncBus::new(config.channel_capacity);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "SessionManager started with new epoch");
        Self {
            state: RwLock::new(EngineState {
                floor,
                processed: HashSet::new(),
                closed: Vec::new(),
            }),
            catalog,
            ledger,
            approval,
            config,
            event_tx,
            sync,
            store: RwLock::new(None),
            epoch,
        }
    }

    /// Engine instance id, unique per startup.
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Attach a snapshot store; manager slices are saved on every commit.
    pub fn set_store(&self, store: Arc<dyn SnapshotStore>) {
        *self.store.write() = Some(store);
    }

    /// Restore floor / closed-log / processed-command slices. Last saved
    /// snapshot wins.
    pub fn restore(&self, store: &dyn SnapshotStore) {
        let mut state = self.state.write();
        if let Some(value) = store.load(FLOOR_KEY) {
            match serde_json::from_value::<FloorPlan>(value) {
                Ok(floor) => state.floor = floor,
                Err(e) => tracing::warn!(error = %e, "Discarding unreadable floor snapshot"),
            }
        }
        if let Some(value) = store.load(CLOSED_KEY)
            && let Ok(closed) = serde_json::from_value::<Vec<ClosedTransaction>>(value)
        {
            state.closed = closed;
        }
        if let Some(value) = store.load(PROCESSED_KEY)
            && let Ok(ids) = serde_json::from_value::<Vec<String>>(value)
        {
            state.processed = ids.into_iter().collect();
        }
        tracing::info!(
            tables = state.floor.tables.len(),
            occupied = state.floor.occupied_count(),
            sequence = state.floor.last_sequence,
            "Engine state restored"
        );
    }

    /// Subscribe to committed events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// The state-update bus replicas attach to.
    pub fn sync_bus(&self) -> &SyncBus {
        &self.sync
    }

    /// The approval gate guarding privileged commands.
    pub fn approval_gate(&self) -> &ApprovalGate {
        &self.approval
    }

    /// Execute a command and return the response.
    pub fn execute_command(&self, cmd: SessionCommand) -> CommandResponse {
        match self.process_command(&cmd) {
            Ok((response, events)) => {
                // Broadcast events after successful commit
                for event in &events {
                    if self.event_tx.receiver_count() > 0
                        && self.event_tx.send(event.clone()).is_err()
                    {
                        tracing::warn!("Event broadcast failed: no active receivers");
                        break;
                    }
                }
                if !events.is_empty() {
                    self.publish_sync_updates();
                }
                response
            }
            Err(err) => {
                tracing::debug!(command_id = %cmd.command_id, error = %err, "Command rejected");
                CommandResponse::error(cmd.command_id, err.into())
            }
        }
    }

    /// Process a command under the state lock.
    fn process_command(
        &self,
        cmd: &SessionCommand,
    ) -> ManagerResult<(CommandResponse, Vec<SessionEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        // 1. Idempotency check
        {
            let state = self.state.read();
            if state.processed.contains(&cmd.command_id) {
                tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
                return Ok((CommandResponse::duplicate(cmd.command_id.clone()), vec![]));
            }
        }

        // 2. Approval check for privileged commands
        let authorized_by = if cmd.payload.is_privileged() {
            if cmd.operator.is_manager() {
                Some(cmd.operator.name.clone())
            } else {
                match &cmd.approval_token {
                    Some(token) => Some(self.approval.redeem(token)?.approver),
                    None => {
                        return Err(ManagerError::ApprovalRequired(
                            cmd.payload.describe().to_string(),
                        ));
                    }
                }
            }
        } else {
            None
        };

        let mut state = self.state.write();

        // Double-check idempotency under the write lock
        if state.processed.contains(&cmd.command_id) {
            return Ok((CommandResponse::duplicate(cmd.command_id.clone()), vec![]));
        }

        // 3. Convert to action and execute
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            operator: cmd.operator.clone(),
            timestamp: cmd.timestamp,
            authorized_by,
        };
        let events = {
            let mut ctx = CommandContext::new(
                &state.floor,
                &self.catalog,
                &self.config,
                state.floor.last_sequence,
            );
            let action = CommandAction::from(cmd);
            action.execute(&mut ctx, &metadata)?
        };

        // 4. Stock pre-flight: under the reject policy the whole command
        // fails before any state mutates
        if self.config.stock_policy == StockPolicy::Reject {
            let all_deltas: Vec<_> = events
                .iter()
                .filter_map(|e| e.stock_effects())
                .flat_map(|(deltas, _)| deltas.iter().cloned())
                .collect();
            self.ledger.validate(&all_deltas)?;
        }

        // 5. Apply events to the floor
        for event in &events {
            let applier: EventAction = event.into();
            applier.apply(&mut state.floor, event);

            match &event.payload {
                EventPayload::SessionClosed { closed } => {
                    state.closed.push(closed.clone());
                }
                EventPayload::TableVoided { voided_lines, .. } => {
                    for line in voided_lines {
                        tracing::info!(
                            table_id = %event.table_id,
                            line = %line.name,
                            amount = line.amount,
                            operator = %event.operator.name,
                            "Void log entry"
                        );
                    }
                }
                _ => {}
            }
        }

        // 6. Apply stock deltas through the ledger; each emits one audit
        // entry, grouped per logical action
        for event in &events {
            if let Some((deltas, group_id)) = event.stock_effects() {
                for delta in deltas {
                    let ctx = AdjustContext::new(&cmd.operator).with_group(group_id);
                    self.ledger
                        .adjust(&delta.item_id, delta.delta, &delta.note, ctx)?;
                }
            }
        }

        // 7. Mark processed and persist
        state.processed.insert(cmd.command_id.clone());
        self.persist(&state);

        // 8. Response (events are broadcast by the caller after the lock
        // drops)
        let session_id = events.first().map(|e| e.session_id.clone());
        tracing::info!(
            command_id = %cmd.command_id,
            session_id = ?session_id,
            event_count = events.len(),
            "Command processed successfully"
        );
        Ok((
            CommandResponse::success(cmd.command_id.clone(), session_id),
            events,
        ))
    }

    fn persist(&self, state: &EngineState) {
        let Some(store) = self.store.read().clone() else {
            return;
        };
        match serde_json::to_value(&state.floor) {
            Ok(value) => store.save(FLOOR_KEY, value),
            Err(e) => tracing::error!(error = %e, "Failed to serialize floor"),
        }
        match serde_json::to_value(&state.closed) {
            Ok(value) => store.save(CLOSED_KEY, value),
            Err(e) => tracing::error!(error = %e, "Failed to serialize closed log"),
        }
        let ids: Vec<&String> = state.processed.iter().collect();
        match serde_json::to_value(&ids) {
            Ok(value) => store.save(PROCESSED_KEY, value),
            Err(e) => tracing::error!(error = %e, "Failed to serialize processed commands"),
        }
    }

    /// Push fresh floor and ledger slices to attached replicas.
    fn publish_sync_updates(&self) {
        let (floor_value, revision) = {
            let state = self.state.read();
            match serde_json::to_value(&state.floor) {
                Ok(v) => (v, state.floor.last_sequence),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize floor for sync");
                    return;
                }
            }
        };
        self.sync.publish(StateUpdate {
            key: FLOOR_KEY.to_string(),
            revision,
            value: floor_value,
            origin: ENGINE_ORIGIN.to_string(),
        });
        if let Ok(levels) = serde_json::to_value(self.ledger.levels()) {
            self.sync.publish(StateUpdate {
                key: "ledger".to_string(),
                revision,
                value: levels,
                origin: ENGINE_ORIGIN.to_string(),
            });
        }
    }

    // ========== Public Query Methods ==========

    /// Snapshot of the whole floor.
    pub fn floor(&self) -> FloorPlan {
        self.state.read().floor.clone()
    }

    /// Session currently on a table, if any.
    pub fn session(&self, table_id: &str) -> Option<Session> {
        self.state.read().floor.session(table_id).cloned()
    }

    /// Closed transactions, oldest first.
    pub fn closed_transactions(&self) -> Vec<ClosedTransaction> {
        self.state.read().closed.clone()
    }

    /// Current global sequence.
    pub fn current_sequence(&self) -> u64 {
        self.state.read().floor.last_sequence
    }
}

#[cfg(test)]
mod tests;
