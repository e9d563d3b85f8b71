//! Transfer gate - combines the allowlist with the identity oracle

use idtoken_core::Address;
use idtoken_oracle::IdentityOracleAdapter;
use tracing::{debug, warn};

use crate::allowlist::Allowlist;
use crate::config::{GateConfig, OffenderReporting};
use crate::decision::{GateDecision, RejectReason};
use crate::error::GateResult;

/// Decides whether a balance change between two accounts may happen.
///
/// An account is eligible if it is allowlisted or the oracle reports a linked
/// identity. Both endpoints are always evaluated.
#[derive(Debug)]
pub struct TransferGate {
    allowlist: Allowlist,
    oracle: IdentityOracleAdapter,
    config: GateConfig,
}

impl TransferGate {
    pub fn new(allowlist: Allowlist, oracle: IdentityOracleAdapter, config: GateConfig) -> Self {
        Self {
            allowlist,
            oracle,
            config,
        }
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    pub fn oracle(&self) -> &IdentityOracleAdapter {
        &self.oracle
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Privileged allowlist update, see [`Allowlist::set`]
    pub fn set_allowlist(&mut self, account: Address, allowed: bool) -> GateResult<()> {
        self.allowlist.set(account, allowed)
    }

    /// `allowlisted(account) || identity_linked(account)`
    ///
    /// The oracle is not consulted for allowlisted accounts.
    pub async fn is_eligible(&self, account: Address) -> bool {
        if self.allowlist.is_allowlisted(&account) {
            return true;
        }
        self.oracle.is_identity_linked(account).await
    }

    /// Evaluate both endpoints and decide.
    ///
    /// A failing source takes precedence over a failing destination.
    pub async fn may_transfer(&self, from: Address, to: Address) -> GateDecision {
        let (from_eligible, to_eligible) =
            tokio::join!(self.is_eligible(from), self.is_eligible(to));

        if !from_eligible {
            warn!(%from, %to, "Transfer gate rejected source");
            return GateDecision::rejected(RejectReason::SourceNotEligible, from);
        }

        if !to_eligible {
            let cited = match self.config.offender_reporting {
                OffenderReporting::Offender => to,
                OffenderReporting::Sender => from,
            };
            warn!(%from, %to, %cited, "Transfer gate rejected destination");
            return GateDecision::rejected(RejectReason::DestinationNotEligible, cited);
        }

        debug!(%from, %to, "Transfer gate approved");
        GateDecision::Approved
    }
}
