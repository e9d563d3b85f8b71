//! Token configuration
//!
//! Construction parameters, immutable once the ledger is built. Every field
//! has a default so partial JSON files work.

use idtoken_core::{Address, TokenMetadata};
use idtoken_gate::GateConfig;
use idtoken_oracle::OracleConfig;
use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::TokenLedger`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Display metadata
    #[serde(default)]
    pub token: TokenMetadata,

    /// Identity oracle settings
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Transfer gate settings
    #[serde(default)]
    pub gate: GateConfig,

    /// Accounts allowlisted at construction (the null account always is)
    #[serde(default)]
    pub allowlist: Vec<Address>,

    /// Event bus buffer per subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_event_capacity() -> usize {
    1024
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token: TokenMetadata::default(),
            oracle: OracleConfig::default(),
            gate: GateConfig::default(),
            allowlist: Vec::new(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl TokenConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
