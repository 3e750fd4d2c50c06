//! Session events - immutable facts recorded after command processing.

use serde::{Deserialize, Serialize};

use crate::inventory::StockDelta;
use crate::types::Actor;

use super::types::{ClosedTransaction, OrderLine};

/// Session event - one committed state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number - the authoritative ordering for replay
    pub sequence: u64,
    /// Table this event belongs to (routing key for replicas)
    pub table_id: String,
    /// Session the event touched
    pub session_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Client timestamp from the originating command, for audit; may differ
    /// from server time due to clock skew
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    pub operator: Actor,
    /// Command that produced this event
    pub command_id: String,
    pub event_type: SessionEventType,
    pub payload: EventPayload,
}

impl SessionEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence: u64,
        table_id: String,
        session_id: String,
        operator: Actor,
        command_id: String,
        client_timestamp: Option<i64>,
        event_type: SessionEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            table_id,
            session_id,
            timestamp: crate::util::now_millis(),
            client_timestamp,
            operator,
            command_id,
            event_type,
            payload,
        }
    }

    /// Stock effects this event commits, if any, with their group id.
    pub fn stock_effects(&self) -> Option<(&[StockDelta], &str)> {
        match &self.payload {
            EventPayload::PackageSelected {
                stock_deltas,
                group_id,
                ..
            }
            | EventPayload::OrdersAdded {
                stock_deltas,
                group_id,
                ..
            } if !stock_deltas.is_empty() => Some((stock_deltas.as_slice(), group_id.as_str())),
            _ => None,
        }
    }
}

/// Event type enumeration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEventType {
    // Lifecycle
    TableOpened,
    SessionClosed,
    TableVoided,

    // Orders
    PackageSelected,
    OrdersAdded,
    OrderVoided,

    // Session info
    PaxChanged,

    // Table operations
    TableMerged,
    TableMergedOut,
    TableTransferred,
}

impl std::fmt::Display for SessionEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEventType::TableOpened => write!(f, "TABLE_OPENED"),
            SessionEventType::SessionClosed => write!(f, "SESSION_CLOSED"),
            SessionEventType::TableVoided => write!(f, "TABLE_VOIDED"),
            SessionEventType::PackageSelected => write!(f, "PACKAGE_SELECTED"),
            SessionEventType::OrdersAdded => write!(f, "ORDERS_ADDED"),
            SessionEventType::OrderVoided => write!(f, "ORDER_VOIDED"),
            SessionEventType::PaxChanged => write!(f, "PAX_CHANGED"),
            SessionEventType::TableMerged => write!(f, "TABLE_MERGED"),
            SessionEventType::TableMergedOut => write!(f, "TABLE_MERGED_OUT"),
            SessionEventType::TableTransferred => write!(f, "TABLE_TRANSFERRED"),
        }
    }
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    // ========== Lifecycle ==========
    TableOpened {
        table_label: String,
        persons: i32,
    },

    SessionClosed {
        closed: ClosedTransaction,
    },

    TableVoided {
        /// Active priced lines at void time, for the void log
        voided_lines: Vec<VoidedLine>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorized_by: Option<String>,
    },

    // ========== Orders ==========
    PackageSelected {
        package_id: String,
        package_name: String,
        /// Auto lines of the previous package, physically removed
        removed_line_ids: Vec<String>,
        /// The package charge line
        package_line: OrderLine,
        /// Auto side lines generated by this package
        auto_lines: Vec<OrderLine>,
        stock_deltas: Vec<StockDelta>,
        group_id: String,
    },

    OrdersAdded {
        lines: Vec<OrderLine>,
        stock_deltas: Vec<StockDelta>,
        group_id: String,
    },

    OrderVoided {
        line_id: String,
        line_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorized_by: Option<String>,
    },

    // ========== Session info ==========
    PaxChanged {
        persons: i32,
        previous: i32,
    },

    // ========== Table operations ==========
    TableMergedOut {
        target_table_id: String,
        target_label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorized_by: Option<String>,
    },

    TableMerged {
        source_table_id: String,
        source_label: String,
        persons_added: i32,
        /// Lines carried over from the source session
        lines: Vec<OrderLine>,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorized_by: Option<String>,
    },

    TableTransferred {
        target_table_id: String,
        target_label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        authorized_by: Option<String>,
    },
}

/// Snapshot of one line written to the void log when a whole table is voided.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoidedLine {
    pub line_id: String,
    pub name: String,
    pub amount: f64,
}
