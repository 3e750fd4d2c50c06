//! Command / event plumbing shared by every action and applier.

use shared::catalog::Catalog;
use shared::session::{FloorPlan, Session, SessionEvent, Table};
use shared::types::Actor;

use crate::config::EngineConfig;

/// Typed failures produced while validating or executing a command.
///
/// All of these are local, recoverable conditions; the engine never panics
/// on a bad command.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("table not found: {0}")]
    TableNotFound(String),
    #[error("table is occupied: {0}")]
    TableOccupied(String),
    #[error("table has no active session: {0}")]
    TableNotOccupied(String),
    #[error("order line not found: {0}")]
    LineNotFound(String),
    #[error("order line already voided: {0}")]
    LineAlreadyVoided(String),
    #[error("unknown package: {0}")]
    UnknownPackage(String),
    #[error("unknown meat: {0}")]
    UnknownMeat(String),
    #[error("no package selected on table {0}")]
    NoPackageSelected(String),
    #[error("meat {meat} is not included in package {package}")]
    MeatNotEligible { meat: String, package: String },
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Attribution carried from the command into every produced event.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator: Actor,
    /// Client timestamp from the command
    pub timestamp: i64,
    /// Manager who authorized a privileged command (operator themselves
    /// when they hold the Manager role)
    pub authorized_by: Option<String>,
}

/// Read-only view handed to actions, plus the sequence allocator.
///
/// Actions are pure with respect to the floor: they read state and produce
/// events; only appliers mutate.
pub struct CommandContext<'a> {
    floor: &'a FloorPlan,
    pub catalog: &'a Catalog,
    pub config: &'a EngineConfig,
    sequence: u64,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        floor: &'a FloorPlan,
        catalog: &'a Catalog,
        config: &'a EngineConfig,
        current_sequence: u64,
    ) -> Self {
        Self {
            floor,
            catalog,
            config,
            sequence: current_sequence,
        }
    }

    /// Allocate the next global sequence number.
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    // Lookups hand back references tied to the floor borrow, not to the
    // context, so actions can keep them across next_sequence() calls.

    pub fn floor(&self) -> &'a FloorPlan {
        self.floor
    }

    /// The table, or `TableNotFound`.
    pub fn table(&self, table_id: &str) -> Result<&'a Table, SessionError> {
        self.floor
            .table(table_id)
            .ok_or_else(|| SessionError::TableNotFound(table_id.to_string()))
    }

    /// The table and its session; fails if the table is available.
    pub fn occupied(&self, table_id: &str) -> Result<(&'a Table, &'a Session), SessionError> {
        let table = self.table(table_id)?;
        match table.state.session() {
            Some(session) => Ok((table, session)),
            None => Err(SessionError::TableNotOccupied(table.label.clone())),
        }
    }

    /// The table, which must be free; fails if occupied.
    pub fn available(&self, table_id: &str) -> Result<&'a Table, SessionError> {
        let table = self.table(table_id)?;
        if table.state.is_available() {
            Ok(table)
        } else {
            Err(SessionError::TableOccupied(table.label.clone()))
        }
    }
}

/// One command type's validation + event production.
pub trait CommandHandler {
    fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<SessionEvent>, SessionError>;
}

/// One event type's state mutation. Appliers are PURE functions of
/// (floor, event) so replicas replaying the event stream converge on the
/// engine's state.
pub trait EventApplier {
    fn apply(&self, floor: &mut FloorPlan, event: &SessionEvent);
}
