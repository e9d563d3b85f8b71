//! Gate decisions

use idtoken_core::Address;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Why the gate rejected a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    #[strum(serialize = "source not linked or allowlisted")]
    SourceNotEligible,

    #[strum(serialize = "destination not linked or allowlisted")]
    DestinationNotEligible,
}

/// Outcome of [`crate::TransferGate::may_transfer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Both endpoints are eligible
    Approved,
    /// Transfer refused; `account` is the account cited in the rejection
    Rejected {
        reason: RejectReason,
        account: Address,
    },
}

impl GateDecision {
    pub fn rejected(reason: RejectReason, account: Address) -> Self {
        GateDecision::Rejected { reason, account }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, GateDecision::Approved)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, GateDecision::Rejected { .. })
    }
}
