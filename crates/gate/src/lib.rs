//! IDToken Gate - Transfer eligibility
//!
//! Every balance mutation asks the [`TransferGate`] first:
//!
//! ```text
//!             (from, to)
//!                 │
//!        ┌────────┴────────┐
//!        ▼                 ▼
//! ┌─────────────┐   ┌─────────────┐
//! │ eligible    │   │ eligible    │   allowlisted(account)
//! │ (from)      │   │ (to)        │   || identity_linked(account)
//! └──────┬──────┘   └──────┬──────┘
//!        └────────┬────────┘
//!                 ▼
//!     Approved | Rejected { reason, account }
//! ```
//!
//! The gate is read-only. Allowlist mutation is a privileged capability of the
//! embedding ledger.

pub mod allowlist;
pub mod config;
pub mod decision;
pub mod error;
pub mod gate;

pub use allowlist::Allowlist;
pub use config::{GateConfig, OffenderReporting};
pub use decision::{GateDecision, RejectReason};
pub use error::{GateError, GateResult};
pub use gate::TransferGate;
