//! Balance table and total supply
//!
//! Updates are two-phase: [`Balances::plan`] validates and computes every new
//! value without touching state, [`Balances::commit`] writes them. A failed
//! plan leaves the table untouched.

use std::collections::HashMap;

use idtoken_core::{Address, Amount};

use crate::error::{TokenError, TokenResult};

/// Account balances plus total supply.
///
/// # Invariant
/// The sum of all balances equals `total_supply`.
#[derive(Debug, Clone, Default)]
pub struct Balances {
    accounts: HashMap<Address, Amount>,
    total_supply: Amount,
}

/// Validated effect of one `from -> to` movement, ready to commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceUpdate {
    /// Total supply after the update
    pub total_supply: Amount,
    /// New balances, applied in order
    pub writes: Vec<(Address, Amount)>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account`; absent entries are zero
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.accounts.get(account).copied().unwrap_or(Amount::ZERO)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Compute the effect of moving `amount` from `from` to `to`.
    ///
    /// A null `from` mints, a null `to` burns.
    pub fn plan(&self, from: Address, to: Address, amount: Amount) -> TokenResult<BalanceUpdate> {
        let mut supply = self.total_supply;
        let mut writes = Vec::with_capacity(2);

        if from.is_zero() {
            supply = supply
                .checked_add(amount)
                .ok_or(TokenError::SupplyOverflow { supply, amount })?;
        } else {
            let balance = self.balance_of(&from);
            let remaining = balance
                .checked_sub(amount)
                .ok_or(TokenError::InsufficientBalance {
                    sender: from,
                    balance,
                    needed: amount,
                })?;
            writes.push((from, remaining));
        }

        if to.is_zero() {
            supply = supply.checked_sub(amount).ok_or_else(|| {
                TokenError::ConservationViolated(format!(
                    "burning {amount} exceeds total supply {supply}"
                ))
            })?;
        } else {
            // Self-transfers credit the already-debited balance.
            let current = writes
                .iter()
                .find(|(account, _)| *account == to)
                .map(|(_, balance)| *balance)
                .unwrap_or_else(|| self.balance_of(&to));
            let credited = current.checked_add(amount).ok_or_else(|| {
                TokenError::ConservationViolated(format!(
                    "crediting {amount} to {to} overflows balance {current}"
                ))
            })?;
            writes.push((to, credited));
        }

        Ok(BalanceUpdate {
            total_supply: supply,
            writes,
        })
    }

    /// Apply a planned update
    pub fn commit(&mut self, update: BalanceUpdate) {
        for (account, balance) in update.writes {
            self.accounts.insert(account, balance);
        }
        self.total_supply = update.total_supply;
    }

    /// All accounts that ever held a balance (zeroed entries included)
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.accounts.iter()
    }

    /// Sum of all balances, `None` if it does not fit
    pub fn sum(&self) -> Option<Amount> {
        self.accounts
            .values()
            .try_fold(Amount::ZERO, |acc, balance| acc.checked_add(*balance))
    }

    /// Does the balance table add up to the total supply?
    pub fn is_conserved(&self) -> bool {
        self.sum() == Some(self.total_supply)
    }
}
