//! Floor plan and session snapshots - computed state from the event stream.
//!
//! A table is a tagged union: `Available` or `Occupied` with its session
//! inside. An occupied table without a session is unrepresentable.
//!
//! The floor plan carries a `state_checksum` so replicas can compare their
//! locally applied state with the engine's and trigger a full resync on
//! drift.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::Hash;

use super::types::OrderLine;

/// One dining engagement on a table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub session_id: String,
    /// Party size, always >= 1
    pub persons: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    pub opened_at: i64,
    pub lines: Vec<OrderLine>,
    /// Labels of tables merged into this session
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_from: Vec<String>,
    /// Billable subtotal; recomputed by the engine after every mutation
    #[serde(default)]
    pub subtotal: f64,
    pub updated_at: i64,
}

impl Session {
    pub fn new(session_id: String, persons: i32, opened_at: i64) -> Self {
        Self {
            session_id,
            persons,
            package_id: None,
            package_name: None,
            opened_at,
            lines: Vec::new(),
            merged_from: Vec::new(),
            subtotal: 0.0,
            updated_at: opened_at,
        }
    }

    pub fn line(&self, line_id: &str) -> Option<&OrderLine> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    pub fn line_mut(&mut self, line_id: &str) -> Option<&mut OrderLine> {
        self.lines.iter_mut().find(|l| l.line_id == line_id)
    }

    /// Non-voided lines.
    pub fn active_lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter().filter(|l| !l.voided)
    }
}

/// Table occupancy state. The session lives inside the `Occupied` variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableState {
    #[default]
    Available,
    Occupied {
        session: Session,
    },
}

impl TableState {
    pub fn is_available(&self) -> bool {
        matches!(self, TableState::Available)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            TableState::Available => None,
            TableState::Occupied { session } => Some(session),
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match self {
            TableState::Available => None,
            TableState::Occupied { session } => Some(session),
        }
    }

    /// Free the table, returning the session that was on it.
    pub fn take_session(&mut self) -> Option<Session> {
        match std::mem::take(self) {
            TableState::Available => None,
            TableState::Occupied { session } => Some(session),
        }
    }
}

/// One physical seating unit. Created at init; never destroyed at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub table_id: String,
    pub label: String,
    pub seats: u32,
    #[serde(default)]
    pub state: TableState,
}

impl Table {
    pub fn new(table_id: impl Into<String>, label: impl Into<String>, seats: u32) -> Self {
        Self {
            table_id: table_id.into(),
            label: label.into(),
            seats,
            state: TableState::Available,
        }
    }
}

/// The whole floor: every table, keyed by id, plus the replay cursor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FloorPlan {
    pub tables: BTreeMap<String, Table>,
    /// Last applied event sequence
    pub last_sequence: u64,
    /// Checksum over occupancy state for replica drift detection
    #[serde(default)]
    pub state_checksum: String,
}

impl FloorPlan {
    pub fn new(tables: Vec<Table>) -> Self {
        let mut plan = Self {
            tables: tables
                .into_iter()
                .map(|t| (t.table_id.clone(), t))
                .collect(),
            last_sequence: 0,
            state_checksum: String::new(),
        };
        plan.update_checksum();
        plan
    }

    pub fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.get(table_id)
    }

    pub fn table_mut(&mut self, table_id: &str) -> Option<&mut Table> {
        self.tables.get_mut(table_id)
    }

    pub fn session(&self, table_id: &str) -> Option<&Session> {
        self.tables.get(table_id).and_then(|t| t.state.session())
    }

    pub fn session_mut(&mut self, table_id: &str) -> Option<&mut Session> {
        self.tables
            .get_mut(table_id)
            .and_then(|t| t.state.session_mut())
    }

    pub fn occupied_count(&self) -> usize {
        self.tables
            .values()
            .filter(|t| !t.state.is_available())
            .count()
    }

    /// Compute the drift-detection checksum.
    ///
    /// Hashed fields: table count, occupied count, total persons, total
    /// line count, and last_sequence. Cheap on purpose - replicas run it
    /// after every applied update.
    pub fn compute_checksum(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher as _;

        let mut hasher = DefaultHasher::new();
        self.tables.len().hash(&mut hasher);
        self.occupied_count().hash(&mut hasher);
        let mut persons = 0i64;
        let mut lines = 0usize;
        for t in self.tables.values() {
            if let Some(s) = t.state.session() {
                persons += s.persons as i64;
                lines += s.lines.len();
            }
        }
        persons.hash(&mut hasher);
        lines.hash(&mut hasher);
        self.last_sequence.hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    pub fn update_checksum(&mut self) {
        self.state_checksum = self.compute_checksum();
    }

    pub fn verify_checksum(&self) -> bool {
        self.state_checksum == self.compute_checksum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> FloorPlan {
        FloorPlan::new(vec![Table::new("t1", "T1", 4), Table::new("t2", "T2", 2)])
    }

    #[test]
    fn test_tables_start_available() {
        let plan = floor();
        assert_eq!(plan.occupied_count(), 0);
        assert!(plan.table("t1").unwrap().state.is_available());
        assert!(plan.session("t1").is_none());
    }

    #[test]
    fn test_occupied_table_owns_session() {
        let mut plan = floor();
        plan.table_mut("t1").unwrap().state = TableState::Occupied {
            session: Session::new("s1".to_string(), 4, 1000),
        };
        assert_eq!(plan.occupied_count(), 1);
        assert_eq!(plan.session("t1").unwrap().persons, 4);
    }

    #[test]
    fn test_take_session_frees_table() {
        let mut plan = floor();
        plan.table_mut("t1").unwrap().state = TableState::Occupied {
            session: Session::new("s1".to_string(), 2, 1000),
        };
        let session = plan.table_mut("t1").unwrap().state.take_session();
        assert_eq!(session.unwrap().session_id, "s1");
        assert!(plan.table("t1").unwrap().state.is_available());
    }

    #[test]
    fn test_checksum_tracks_occupancy() {
        let mut plan = floor();
        plan.update_checksum();
        let before = plan.state_checksum.clone();
        plan.table_mut("t1").unwrap().state = TableState::Occupied {
            session: Session::new("s1".to_string(), 4, 1000),
        };
        plan.update_checksum();
        assert_ne!(before, plan.state_checksum);
        assert!(plan.verify_checksum());
    }
}
