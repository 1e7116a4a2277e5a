//! Error types for dialog-core
//!
//! Dialog and transaction operations report contract violations as values;
//! lookups of things that do not exist return `None` instead.

use thiserror::Error;

use crate::dialog::{DialogId, InitiateParty};
use crate::transaction::{TransactionId, TransactionState};

/// Errors raised by [`Dialog`](crate::Dialog) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    /// A reinvite is already outstanding on this dialog
    #[error("Reinvite already in progress on dialog {dialog} (initiated by {initiator})")]
    ReinviteInProgress {
        dialog: DialogId,
        initiator: InitiateParty,
    },

    /// The dialog has ended and accepts no further changes
    #[error("Dialog {dialog} is terminated")]
    Terminated { dialog: DialogId },
}

/// Errors raised by [`Transaction`](crate::Transaction) and
/// [`TransactionManager`](crate::TransactionManager) operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// The requested state change is not allowed from the current state
    #[error("Invalid transition for transaction {id}: {from} -> {to}")]
    InvalidTransition {
        id: TransactionId,
        from: TransactionState,
        to: TransactionState,
    },

    /// The owning dialog is terminated
    #[error(transparent)]
    Dialog(#[from] DialogError),
}

pub type DialogResult<T> = std::result::Result<T, DialogError>;

pub type TransactionResult<T> = std::result::Result<T, TransactionError>;
