//! IDToken Ledger - Identity-gated fungible token bookkeeping
//!
//! This is the HEART of IDToken. All balance and supply changes go through
//! one gated update:
//!
//! ```text
//! transfer / transfer_from / mint / burn
//!                  │
//!                  ▼
//!           apply_update(from, to, amount)
//!                  │
//!                  ▼
//!        TransferGate::may_transfer ──► Rejected? InvalidTransfer
//!                  │ Approved
//!                  ▼
//!        plan balances + supply    ──► InsufficientBalance
//!                  │
//!                  ▼
//!        commit, publish Transfer
//! ```
//!
//! # Key Types
//! - `TokenLedger`: balances, allowances, total supply and the gate
//! - `LedgerBuilder`: wires config, identity registry and event bus
//! - `TokenConfig`: construction parameters, loadable from JSON
//! - `TokenError`: the closed set of rejected-operation outcomes

pub mod allowance;
pub mod balances;
pub mod config;
pub mod error;
pub mod ledger;
pub mod validation;

pub use allowance::Allowances;
pub use balances::{BalanceUpdate, Balances};
pub use config::TokenConfig;
pub use error::{TokenError, TokenResult};
pub use ledger::{LedgerBuilder, TokenLedger};
