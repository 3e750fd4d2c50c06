//! Manager error type and its mapping onto wire error codes.

use shared::session::{CommandError, CommandErrorCode};

use crate::approval::ApprovalError;
use crate::inventory::LedgerError;
use crate::sessions::traits::SessionError;

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors surfaced by command processing.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("manager approval required to {0}")]
    ApprovalRequired(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Approval(#[from] ApprovalError),
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let code = match &err {
            ManagerError::ApprovalRequired(_) | ManagerError::Approval(_) => {
                CommandErrorCode::ApprovalRequired
            }
            ManagerError::Ledger(LedgerError::InsufficientStock { .. }) => {
                CommandErrorCode::InsufficientStock
            }
            ManagerError::Session(e) => match e {
                SessionError::TableNotFound(_) => CommandErrorCode::TableNotFound,
                SessionError::TableOccupied(_) => CommandErrorCode::TableOccupied,
                SessionError::TableNotOccupied(_) => CommandErrorCode::TableNotOccupied,
                SessionError::LineNotFound(_) => CommandErrorCode::LineNotFound,
                SessionError::LineAlreadyVoided(_) => CommandErrorCode::LineAlreadyVoided,
                SessionError::UnknownPackage(_) => CommandErrorCode::UnknownPackage,
                SessionError::UnknownMeat(_) => CommandErrorCode::UnknownMeat,
                SessionError::NoPackageSelected(_) => CommandErrorCode::NoPackageSelected,
                SessionError::MeatNotEligible { .. } => CommandErrorCode::MeatNotEligible,
                SessionError::InvalidOperation(_) => CommandErrorCode::InvalidOperation,
            },
        };
        CommandError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = ManagerError::Session(SessionError::TableOccupied("T1".to_string()));
        let wire: CommandError = err.into();
        assert_eq!(wire.code, CommandErrorCode::TableOccupied);

        let err = ManagerError::ApprovalRequired("void order".to_string());
        let wire: CommandError = err.into();
        assert_eq!(wire.code, CommandErrorCode::ApprovalRequired);

        let err = ManagerError::Ledger(LedgerError::InsufficientStock {
            item_id: "rice".to_string(),
            requested: 5.0,
            available: 2.0,
        });
        let wire: CommandError = err.into();
        assert_eq!(wire.code, CommandErrorCode::InsufficientStock);
    }
}
