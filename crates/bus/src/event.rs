//! Token events for pub/sub distribution

use chrono::{DateTime, Utc};
use idtoken_core::{Address, Amount};
use serde::{Deserialize, Serialize};

/// Notifications emitted by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TokenEvent {
    /// Balance moved. `from` is the null account for mints, `to` for burns.
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },

    /// Allowance explicitly set by its owner
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
        timestamp: DateTime<Utc>,
    },
}

impl TokenEvent {
    /// Create a Transfer event
    pub fn transfer(from: Address, to: Address, amount: Amount) -> Self {
        Self::Transfer {
            from,
            to,
            amount,
            timestamp: Utc::now(),
        }
    }

    /// Create an Approval event
    pub fn approval(owner: Address, spender: Address, amount: Amount) -> Self {
        Self::Approval {
            owner,
            spender,
            amount,
            timestamp: Utc::now(),
        }
    }

    /// Short event name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            TokenEvent::Transfer { .. } => "Transfer",
            TokenEvent::Approval { .. } => "Approval",
        }
    }

    pub fn amount(&self) -> Amount {
        match self {
            TokenEvent::Transfer { amount, .. } | TokenEvent::Approval { amount, .. } => *amount,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            TokenEvent::Transfer { timestamp, .. } | TokenEvent::Approval { timestamp, .. } => {
                *timestamp
            }
        }
    }

    /// Is this a mint (Transfer from the null account)?
    pub fn is_mint(&self) -> bool {
        matches!(self, TokenEvent::Transfer { from, .. } if from.is_zero())
    }

    /// Is this a burn (Transfer to the null account)?
    pub fn is_burn(&self) -> bool {
        matches!(self, TokenEvent::Transfer { to, .. } if to.is_zero())
    }
}
