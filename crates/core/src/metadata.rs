//! Token metadata - display-only construction parameters

use serde::{Deserialize, Serialize};

/// Immutable token metadata, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    /// Number of decimals used when rendering base units for humans
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    18
}

impl TokenMetadata {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into().to_uppercase(),
            decimals: default_decimals(),
        }
    }

    /// Override the display decimals
    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::new("Identity Token", "IDT")
    }
}
