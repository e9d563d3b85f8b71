//! Token ledger - the gated state machine
//!
//! Mutating operations take `&mut self`: one operation runs to completion
//! before the next starts. Callers sharing a ledger across tasks wrap it in a
//! `tokio::sync::Mutex`.

use std::sync::Arc;

use idtoken_bus::{EventBus, TokenEvent};
use idtoken_core::{Address, Amount, TokenMetadata};
use idtoken_gate::{Allowlist, GateDecision, TransferGate};
use idtoken_oracle::{IdentityOracleAdapter, IdentityRegistry};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::allowance::Allowances;
use crate::balances::Balances;
use crate::config::TokenConfig;
use crate::error::{TokenError, TokenResult};
use crate::validation::{
    validate_approval_parties, validate_burn_sender, validate_mint_receiver,
    validate_transfer_endpoints,
};

/// Identity-gated fungible token ledger
pub struct TokenLedger {
    config: TokenConfig,
    balances: Balances,
    allowances: Allowances,
    gate: TransferGate,
    bus: EventBus,
}

impl TokenLedger {
    /// Create a ledger with zero supply.
    ///
    /// Without a `registry` the oracle is disconnected and only allowlisted
    /// accounts can hold or move tokens.
    pub fn new(config: TokenConfig, registry: Option<Arc<dyn IdentityRegistry>>) -> Self {
        let bus = EventBus::with_capacity(config.event_capacity);
        Self::with_bus(config, registry, bus)
    }

    /// Create a ledger publishing on an existing bus
    pub fn with_bus(
        config: TokenConfig,
        registry: Option<Arc<dyn IdentityRegistry>>,
        bus: EventBus,
    ) -> Self {
        let oracle = match registry {
            Some(registry) => IdentityOracleAdapter::new(registry, &config.oracle),
            None => IdentityOracleAdapter::disconnected(),
        };
        let allowlist = Allowlist::with_accounts(config.allowlist.iter().copied());
        let gate = TransferGate::new(allowlist, oracle, config.gate.clone());

        tracing::info!(
            name = %config.token.name,
            symbol = %config.token.symbol,
            oracle_connected = gate.oracle().is_connected(),
            allowlisted = config.allowlist.len(),
            "Token ledger created"
        );

        Self {
            config,
            balances: Balances::new(),
            allowances: Allowances::new(),
            gate,
            bus,
        }
    }

    // === Metadata ===

    pub fn metadata(&self) -> &TokenMetadata {
        &self.config.token
    }

    pub fn name(&self) -> &str {
        &self.config.token.name
    }

    pub fn symbol(&self) -> &str {
        &self.config.token.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.config.token.decimals
    }

    /// Configured identity registry address, if any
    pub fn identity_registry(&self) -> Option<Address> {
        self.config.oracle.registry
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    // === Reads ===

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.balances.total_supply()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances.get(owner, spender)
    }

    pub fn is_allowlisted(&self, account: &Address) -> bool {
        self.gate.allowlist().is_allowlisted(account)
    }

    /// Ask the identity oracle about `account` (never fails)
    pub async fn is_identity_linked(&self, account: Address) -> bool {
        self.gate.oracle().is_identity_linked(account).await
    }

    /// Dry-run the transfer gate without touching state
    pub async fn may_transfer(&self, from: Address, to: Address) -> GateDecision {
        self.gate.may_transfer(from, to).await
    }

    /// All accounts with a balance entry
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.holders()
    }

    /// Does the balance table add up to the total supply?
    pub fn is_conserved(&self) -> bool {
        self.balances.is_conserved()
    }

    // === Events ===

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Subscribe to Transfer/Approval notifications
    pub fn subscribe(&self) -> broadcast::Receiver<TokenEvent> {
        self.bus.subscribe()
    }

    // === Public mutators ===

    /// Move `amount` from `caller` to `to`
    pub async fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> TokenResult<()> {
        validate_transfer_endpoints(&caller, &to)?;
        self.apply_update(caller, to, amount).await
    }

    /// Set `spender`'s allowance over `caller`'s tokens to exactly `amount`.
    ///
    /// Returns the new allowance.
    pub fn approve(
        &mut self,
        caller: Address,
        spender: Address,
        amount: Amount,
    ) -> TokenResult<Amount> {
        validate_approval_parties(&caller, &spender)?;

        self.allowances.set(caller, spender, amount);
        debug!(owner = %caller, %spender, %amount, "Allowance set");
        self.bus.publish(TokenEvent::approval(caller, spender, amount));

        Ok(amount)
    }

    /// Move `amount` from `from` to `to`, drawing on `caller`'s allowance.
    ///
    /// The allowance decrement is committed only if the transfer succeeds,
    /// and publishes no Approval event.
    pub async fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> TokenResult<()> {
        let remaining = self.allowances.plan_spend(&from, &caller, amount)?;
        if remaining.is_some() {
            validate_approval_parties(&from, &caller)?;
        }
        validate_transfer_endpoints(&from, &to)?;

        self.apply_update(from, to, amount).await?;

        if let Some(remaining) = remaining {
            self.allowances.set(from, caller, remaining);
        }
        Ok(())
    }

    // === Privileged mutators ===

    /// Create `amount` new tokens for `account`
    pub async fn mint(&mut self, account: Address, amount: Amount) -> TokenResult<()> {
        validate_mint_receiver(&account)?;
        self.apply_update(Address::ZERO, account, amount).await
    }

    /// Destroy `amount` of `account`'s tokens
    pub async fn burn(&mut self, account: Address, amount: Amount) -> TokenResult<()> {
        validate_burn_sender(&account)?;
        self.apply_update(account, Address::ZERO, amount).await
    }

    /// Overwrite `account`'s allowlist flag. Clearing the null account fails.
    pub fn set_allowlist(&mut self, account: Address, allowed: bool) -> TokenResult<()> {
        self.gate.set_allowlist(account, allowed)?;
        Ok(())
    }

    // === Gated update ===

    /// The single choke point for balance and supply changes.
    ///
    /// Gate first, then plan, then commit: every check finishes before the
    /// first write.
    async fn apply_update(&mut self, from: Address, to: Address, amount: Amount) -> TokenResult<()> {
        if let GateDecision::Rejected { reason, account } = self.gate.may_transfer(from, to).await {
            warn!(%from, %to, %amount, %reason, %account, "Update rejected by gate");
            return Err(TokenError::InvalidTransfer { reason, account });
        }

        let update = self.balances.plan(from, to, amount).inspect_err(|e| {
            match e {
                TokenError::SupplyOverflow { .. } | TokenError::ConservationViolated(_) => {
                    tracing::error!(%from, %to, %amount, error = %e, "Ledger invariant violated");
                }
                _ => warn!(%from, %to, %amount, error = %e, "Update rejected"),
            }
        })?;
        self.balances.commit(update);

        debug!(%from, %to, %amount, supply = %self.balances.total_supply(), "Update applied");
        self.bus.publish(TokenEvent::transfer(from, to, amount));
        Ok(())
    }
}

impl std::fmt::Debug for TokenLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenLedger")
            .field("symbol", &self.config.token.symbol)
            .field("total_supply", &self.balances.total_supply())
            .field("gate", &self.gate)
            .finish()
    }
}

/// Builder for TokenLedger
pub struct LedgerBuilder {
    config: TokenConfig,
    registry: Option<Arc<dyn IdentityRegistry>>,
    bus: Option<EventBus>,
}

impl LedgerBuilder {
    /// Create a new builder with default config and no registry
    pub fn new() -> Self {
        Self {
            config: TokenConfig::default(),
            registry: None,
            bus: None,
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: TokenConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach an identity registry
    pub fn with_registry(mut self, registry: Arc<dyn IdentityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Allowlist `account` at construction
    pub fn allowlist(mut self, account: Address) -> Self {
        self.config.allowlist.push(account);
        self
    }

    /// Publish on an existing bus
    pub fn with_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Build the ledger
    pub fn build(self) -> TokenLedger {
        match self.bus {
            Some(bus) => TokenLedger::with_bus(self.config, self.registry, bus),
            None => TokenLedger::new(self.config, self.registry),
        }
    }
}

impl Default for LedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
