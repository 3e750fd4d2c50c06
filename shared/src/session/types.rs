//! Order lines, close records, and command response shapes.

use serde::{Deserialize, Serialize};

// ============================================================================
// Order Lines
// ============================================================================

/// What kind of line item this is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    /// The per-pax package charge itself
    Package,
    /// Grill meat, weight-based, included with the package
    Meat,
    Side,
    Dish,
    Drink,
}

/// One line item in a session.
///
/// Voided lines stay in the list for audit; only totals exclude them.
/// Auto lines are regenerated artifacts of package selection and are the
/// only lines a package swap may physically remove.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub line_id: String,
    pub kind: OrderKind,
    pub item_id: String,
    pub name: String,
    pub quantity: i32,
    /// Weight in grams for weight-based meat lines
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_g: Option<f64>,
    pub unit_price: f64,
    /// Estimated cost of the whole line (not per unit), for margin reports
    #[serde(default)]
    pub est_cost: f64,
    /// Generated by package selection (auto sides, auto meats)
    #[serde(default)]
    pub auto: bool,
    /// Package that generated this line, when `auto`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    /// Label of the table this line arrived from in a merge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_from: Option<String>,
    #[serde(default)]
    pub voided: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voided_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voided_at: Option<i64>,
    pub added_by: String,
    pub added_at: i64,
}

impl OrderLine {
    /// Billable amount of this line; zero once voided.
    pub fn line_total(&self) -> f64 {
        if self.voided {
            0.0
        } else {
            self.unit_price * self.quantity as f64
        }
    }
}

/// Payment method recorded at close.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    EWallet,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "CASH"),
            PaymentMethod::Card => write!(f, "CARD"),
            PaymentMethod::EWallet => write!(f, "E_WALLET"),
        }
    }
}

/// Immutable record of one checkout, kept for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClosedTransaction {
    pub session_id: String,
    pub table_id: String,
    pub table_label: String,
    pub persons: i32,
    pub subtotal: f64,
    pub discount_pct: f64,
    pub discount_amount: f64,
    pub leftover_penalty: f64,
    pub total: f64,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_from: Vec<String>,
    pub opened_at: i64,
    pub closed_at: i64,
    pub closed_by: String,
}

// ============================================================================
// Command Response
// ============================================================================

/// Response to one command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    pub success: bool,
    /// Session touched by the command (new session for OpenTable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, session_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            session_id,
            error: None,
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            session_id: None,
            error: Some(error),
        }
    }

    /// A retried command that was already processed. Reported as success so
    /// client retry loops terminate.
    pub fn duplicate(command_id: String) -> Self {
        Self {
            command_id,
            success: true,
            session_id: None,
            error: None,
        }
    }
}

/// Command error detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    TableNotFound,
    TableOccupied,
    TableNotOccupied,
    LineNotFound,
    LineAlreadyVoided,
    UnknownPackage,
    UnknownMeat,
    NoPackageSelected,
    MeatNotEligible,
    InsufficientStock,
    ApprovalRequired,
    InvalidOperation,
    InternalError,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: f64, qty: i32) -> OrderLine {
        OrderLine {
            line_id: "l1".to_string(),
            kind: OrderKind::Side,
            item_id: "rice".to_string(),
            name: "Rice".to_string(),
            quantity: qty,
            weight_g: None,
            unit_price: price,
            est_cost: 0.0,
            auto: false,
            package_id: None,
            merged_from: None,
            voided: false,
            voided_by: None,
            voided_at: None,
            added_by: "Ana".to_string(),
            added_at: 0,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(25.0, 3).line_total(), 75.0);
    }

    #[test]
    fn test_voided_line_total_is_zero() {
        let mut l = line(149.0, 1);
        l.voided = true;
        assert_eq!(l.line_total(), 0.0);
    }
}
