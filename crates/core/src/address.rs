//! Address - Fixed-width account identifier
//!
//! Format: `0x` followed by 40 hex characters (20 bytes).
//! The all-zero address is the null account: it is never a real holder and
//! stands in as the counterparty of mints (source) and burns (destination).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must start with 0x: {0}")]
    MissingPrefix(String),

    #[error("Address must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

/// A 20-byte account identifier.
///
/// # Example
/// ```
/// use idtoken_core::Address;
///
/// let addr: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
/// assert!(!addr.is_zero());
/// assert_eq!(addr.to_string(), "0x00000000000000000000000000000000000000aa");
///
/// assert!(Address::ZERO.is_zero());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// Byte width of an address
    pub const LEN: usize = 20;

    /// The null account
    pub const ZERO: Self = Self([0u8; 20]);

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive a deterministic address from a human label.
    ///
    /// Takes the last 20 bytes of `SHA-256(label)`. Used by scripts and tests
    /// to refer to accounts by name.
    pub fn from_label(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[32 - Self::LEN..]);
        Self(bytes)
    }

    /// Raw bytes
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the null account
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| AddressError::MissingPrefix(s.to_string()))?;

        if digits.len() != Self::LEN * 2 {
            return Err(AddressError::InvalidLength {
                expected: Self::LEN * 2,
                actual: digits.len(),
            });
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}
