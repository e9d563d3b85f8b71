//! Core oracle types

use async_trait::async_trait;
use idtoken_core::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::OracleError;

/// Identity identifier returned by the registry (one 32-byte word).
///
/// The all-zero identifier means "no linked identity".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IdentityId([u8; 32]);

impl IdentityId {
    /// Byte width of a response word
    pub const LEN: usize = 32;

    /// The "no identity" marker
    pub const NONE: Self = Self([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Build an identifier from a small integer (big-endian in the low bytes)
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Decode a raw registry response.
    ///
    /// Anything other than exactly one 32-byte word is malformed.
    pub fn decode(raw: &[u8]) -> Result<Self, OracleError> {
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| OracleError::MalformedResponse {
                expected: Self::LEN,
                actual: raw.len(),
            })?;
        Ok(Self(bytes))
    }

    /// Raw encoding, as a registry would return it
    pub fn encode(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityId({})", self)
    }
}

/// External identity registry - the untrusted service behind the oracle
///
/// Implementations can be:
/// - MockIdentityRegistry: scripted responses for tests
/// - an RPC client against an on-chain registry contract
/// - a KYC provider's HTTP API
///
/// Callers must treat every result, including panics and hangs, as untrusted.
/// Use [`crate::IdentityOracleAdapter`] rather than calling this directly.
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Registry name for logging
    fn name(&self) -> &str {
        "identity_registry"
    }

    /// Look up the identity owning `account`.
    ///
    /// Returns the raw response word; a zero word means "no linked identity".
    async fn owner_identity(&self, account: Address) -> Result<Vec<u8>, OracleError>;
}
