//! Allowance table
//!
//! `Amount::MAX` is the unlimited sentinel: spending against it never
//! decrements.

use std::collections::HashMap;

use idtoken_core::{Address, Amount};

use crate::error::{TokenError, TokenResult};

/// (owner, spender) -> amount the spender may still draw
#[derive(Debug, Clone, Default)]
pub struct Allowances {
    entries: HashMap<(Address, Address), Amount>,
}

impl Allowances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current allowance; absent entries are zero
    pub fn get(&self, owner: &Address, spender: &Address) -> Amount {
        self.entries
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Overwrite the allowance (not additive)
    pub fn set(&mut self, owner: Address, spender: Address, amount: Amount) {
        self.entries.insert((owner, spender), amount);
    }

    /// Check a spend of `amount` by `spender` against `owner`'s allowance.
    ///
    /// Returns the allowance to write back, or `None` when the allowance is
    /// unlimited and stays untouched. Nothing is written here.
    pub fn plan_spend(
        &self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> TokenResult<Option<Amount>> {
        let current = self.get(owner, spender);
        if current.is_unlimited() {
            return Ok(None);
        }

        current
            .checked_sub(amount)
            .map(Some)
            .ok_or(TokenError::InsufficientAllowance {
                spender: *spender,
                allowance: current,
                needed: amount,
            })
    }
}
