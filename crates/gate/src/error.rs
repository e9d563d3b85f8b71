//! Gate errors

use idtoken_core::Address;
use thiserror::Error;

/// Errors from privileged gate operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Null account {0} must stay allowlisted")]
    NullAccountPinned(Address),
}

/// Result type for gate operations
pub type GateResult<T> = Result<T, GateError>;
