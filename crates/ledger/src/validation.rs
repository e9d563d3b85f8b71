//! Endpoint validation
//!
//! The null account is never a caller-supplied endpoint; it only appears as
//! the implicit counterparty inside mint and burn.

use idtoken_core::Address;

use crate::error::TokenError;

/// Validation result with detailed error
pub type ValidationResult = Result<(), TokenError>;

/// Transfer: both endpoints must be real accounts
pub fn validate_transfer_endpoints(from: &Address, to: &Address) -> ValidationResult {
    if from.is_zero() {
        return Err(TokenError::InvalidSender(*from));
    }
    if to.is_zero() {
        return Err(TokenError::InvalidReceiver(*to));
    }
    Ok(())
}

/// Approval: owner and spender must be real accounts
pub fn validate_approval_parties(owner: &Address, spender: &Address) -> ValidationResult {
    if owner.is_zero() {
        return Err(TokenError::InvalidApprover(*owner));
    }
    if spender.is_zero() {
        return Err(TokenError::InvalidSpender(*spender));
    }
    Ok(())
}

/// Mint: the receiver must be a real account
pub fn validate_mint_receiver(account: &Address) -> ValidationResult {
    if account.is_zero() {
        return Err(TokenError::InvalidReceiver(*account));
    }
    Ok(())
}

/// Burn: the sender must be a real account
pub fn validate_burn_sender(account: &Address) -> ValidationResult {
    if account.is_zero() {
        return Err(TokenError::InvalidSender(*account));
    }
    Ok(())
}
