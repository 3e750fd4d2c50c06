//! Manager approval for privileged operations.
//!
//! Two-step flow: `request` challenges a 4-digit PIN and returns a one-shot
//! token; the session manager `redeem`s the token when executing the
//! privileged command. Manager-role operators are granted without a
//! challenge. A wrong PIN is an expected, frequent outcome - it is a value
//! (`Denied`), never an error. No lockout or backoff.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared::types::Actor;
use shared::util::{now_millis, short_id};

/// A manager able to authorize privileged operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerCredential {
    pub name: String,
    /// SHA-256 hex digest of the 4-digit PIN
    pub pin_hash: String,
}

impl ManagerCredential {
    pub fn new(name: impl Into<String>, pin: &str) -> Self {
        Self {
            name: name.into(),
            pin_hash: hash_pin(pin),
        }
    }
}

/// Hex SHA-256 of a PIN.
pub fn hash_pin(pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pin.as_bytes());
    hex::encode(hasher.finalize())
}

/// One-shot grant handed back to the caller, to be attached to the
/// privileged command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovalToken {
    pub token_id: String,
}

/// Outcome of an approval request. Denied is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    Granted(ApprovalToken),
    Denied,
}

impl ApprovalOutcome {
    pub fn token(self) -> Option<ApprovalToken> {
        match self {
            ApprovalOutcome::Granted(t) => Some(t),
            ApprovalOutcome::Denied => None,
        }
    }
}

/// A redeemed grant: who approved what, when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    pub token_id: String,
    pub reason: String,
    pub approver: String,
    pub granted_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    #[error("unknown or already redeemed approval token: {0}")]
    UnknownToken(String),
}

/// The gate. Stateless across requests apart from outstanding tokens.
pub struct ApprovalGate {
    credentials: Vec<ManagerCredential>,
    outstanding: Mutex<HashMap<String, Approval>>,
}

impl std::fmt::Debug for ApprovalGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalGate")
            .field("credentials", &self.credentials.len())
            .field("outstanding", &self.outstanding.lock().len())
            .finish_non_exhaustive()
    }
}

impl ApprovalGate {
    pub fn new(credentials: Vec<ManagerCredential>) -> Self {
        Self {
            credentials,
            outstanding: Mutex::new(HashMap::new()),
        }
    }

    /// Request approval for `reason`.
    ///
    /// A Manager-role operator is granted on their own authority; anyone
    /// else must present a PIN matching a stored credential.
    pub fn request(&self, reason: &str, operator: &Actor, pin: Option<&str>) -> ApprovalOutcome {
        let approver = if operator.is_manager() {
            Some(operator.name.clone())
        } else {
            pin.and_then(|p| {
                let digest = hash_pin(p);
                self.credentials
                    .iter()
                    .find(|c| c.pin_hash == digest)
                    .map(|c| c.name.clone())
            })
        };

        match approver {
            Some(approver) => {
                let approval = Approval {
                    token_id: short_id(),
                    reason: reason.to_string(),
                    approver: approver.clone(),
                    granted_at: now_millis(),
                };
                tracing::info!(reason, approver = %approver, token = %approval.token_id, "Approval granted");
                let token = ApprovalToken {
                    token_id: approval.token_id.clone(),
                };
                self.outstanding.lock().insert(approval.token_id.clone(), approval);
                ApprovalOutcome::Granted(token)
            }
            None => {
                tracing::info!(reason, operator = %operator.name, "Approval denied");
                ApprovalOutcome::Denied
            }
        }
    }

    /// Redeem a token. Tokens are one-shot; redeeming twice fails.
    pub fn redeem(&self, token_id: &str) -> Result<Approval, ApprovalError> {
        self.outstanding
            .lock()
            .remove(token_id)
            .ok_or_else(|| ApprovalError::UnknownToken(token_id.to_string()))
    }
}
