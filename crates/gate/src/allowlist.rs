//! Allowlist - explicit per-account exemption from the identity requirement

use std::collections::HashMap;

use idtoken_core::Address;
use tracing::info;

use crate::error::{GateError, GateResult};

/// Account -> override flag.
///
/// The null account is flagged at construction and the flag can never be
/// cleared: it is the counterparty of every mint and burn.
#[derive(Debug, Clone)]
pub struct Allowlist {
    flags: HashMap<Address, bool>,
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Allowlist {
    /// Create an allowlist containing only the null account
    pub fn new() -> Self {
        let mut flags = HashMap::new();
        flags.insert(Address::ZERO, true);
        Self { flags }
    }

    /// Create an allowlist seeded with `accounts` (plus the null account)
    pub fn with_accounts(accounts: impl IntoIterator<Item = Address>) -> Self {
        let mut allowlist = Self::new();
        for account in accounts {
            allowlist.flags.insert(account, true);
        }
        allowlist
    }

    /// Is `account` exempt from the identity requirement?
    pub fn is_allowlisted(&self, account: &Address) -> bool {
        self.flags.get(account).copied().unwrap_or(false)
    }

    /// Overwrite the flag for `account`.
    ///
    /// Privileged: callers are responsible for authorizing this. Clearing the
    /// null account is refused.
    pub fn set(&mut self, account: Address, allowed: bool) -> GateResult<()> {
        if account.is_zero() && !allowed {
            return Err(GateError::NullAccountPinned(account));
        }

        self.flags.insert(account, allowed);
        info!(%account, allowed, "Allowlist updated");
        Ok(())
    }

    /// Accounts currently flagged true
    pub fn members(&self) -> impl Iterator<Item = &Address> {
        self.flags
            .iter()
            .filter_map(|(account, allowed)| allowed.then_some(account))
    }
}
