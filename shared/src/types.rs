//! Common primitive types: actor attribution and units of measure.

use serde::{Deserialize, Serialize};

/// Operator role. Managers may authorize privileged operations directly;
/// staff need a manager approval token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Staff,
    Manager,
}

/// Who performed an operation. Snapshotted onto events, audit entries and
/// stock movements so records stay attributable after staff changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn staff(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Role::Staff,
        }
    }

    pub fn manager(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: Role::Manager,
        }
    }

    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

/// Unit of measure for inventory quantities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    /// Countable units (portions, bottles, tubs)
    #[default]
    Pieces,
    Grams,
    Milliliters,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Pieces => write!(f, "pcs"),
            Unit::Grams => write!(f, "g"),
            Unit::Milliliters => write!(f, "ml"),
        }
    }
}
