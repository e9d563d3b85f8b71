//! Oracle configuration

use idtoken_core::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the identity oracle adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Address of the identity registry; `None` leaves the oracle disconnected
    /// and every lookup answers `false`
    #[serde(default)]
    pub registry: Option<Address>,

    /// Upper bound for one registry call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    500
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            registry: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl OracleConfig {
    /// Get the call timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
