//! IDToken Identity Oracle
//!
//! Answers "does this account have a verified linked identity?" by querying an
//! external, untrusted [`IdentityRegistry`]. The [`IdentityOracleAdapter`] is
//! the fault boundary: every failure of the registry call (absent registry,
//! error, malformed response, panic, timeout) collapses to `false`.
//!
//! [`MockIdentityRegistry`] provides scripted responses for tests and the CLI.

mod adapter;
mod config;
mod error;
mod mock;
mod types;

pub use adapter::IdentityOracleAdapter;
pub use config::OracleConfig;
pub use error::OracleError;
pub use mock::{MockIdentityRegistry, MockResponse};
pub use types::{IdentityId, IdentityRegistry};
