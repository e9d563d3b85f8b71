//! Ledger errors

use idtoken_core::{Address, Amount};
use idtoken_gate::{GateError, RejectReason};
use thiserror::Error;

/// Errors that can occur in ledger operations.
///
/// Every variant aborts the whole operation; no partial effects remain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid sender: {0}")]
    InvalidSender(Address),

    #[error("Invalid receiver: {0}")]
    InvalidReceiver(Address),

    #[error("Invalid approver: {0}")]
    InvalidApprover(Address),

    #[error("Invalid spender: {0}")]
    InvalidSpender(Address),

    #[error("Insufficient balance for {sender}: have {balance}, need {needed}")]
    InsufficientBalance {
        sender: Address,
        balance: Amount,
        needed: Amount,
    },

    #[error("Insufficient allowance for {spender}: have {allowance}, need {needed}")]
    InsufficientAllowance {
        spender: Address,
        allowance: Amount,
        needed: Amount,
    },

    #[error("Invalid transfer: {reason} ({account})")]
    InvalidTransfer {
        reason: RejectReason,
        account: Address,
    },

    // === Invariant violations ===
    #[error("Supply overflow: supply {supply}, minting {amount}")]
    SupplyOverflow { supply: Amount, amount: Amount },

    #[error("Conservation invariant violated: {0}")]
    ConservationViolated(String),

    // === Privileged operations ===
    #[error(transparent)]
    Allowlist(#[from] GateError),
}

/// Result type for ledger operations
pub type TokenResult<T> = Result<T, TokenError>;

impl TokenError {
    /// Was this a gate rejection?
    pub fn is_gate_rejection(&self) -> bool {
        matches!(self, TokenError::InvalidTransfer { .. })
    }
}
