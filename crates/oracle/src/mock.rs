//! Mock identity registry for testing
//!
//! Scripted per-account responses, including the misbehaviours the adapter
//! has to survive (reverts, garbage, panics, hangs).

use async_trait::async_trait;
use idtoken_core::Address;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::OracleError;
use crate::types::{IdentityId, IdentityRegistry};

/// Scripted answer for one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// Answer with this identity word (may be `IdentityId::NONE`)
    Identity(IdentityId),
    /// Answer with raw bytes, well-formed or not
    Raw(Vec<u8>),
    /// Fail the call
    Revert(String),
    /// Panic inside the registry
    Panic,
    /// Never answer
    Hang,
}

/// Mock Identity Registry for testing
///
/// Unknown accounts answer with the zero identity. Responses can be changed
/// at any time through a shared reference.
pub struct MockIdentityRegistry {
    responses: RwLock<HashMap<Address, MockResponse>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MockIdentityRegistry {
    /// Create a new empty mock registry
    pub fn new() -> Self {
        Self {
            responses: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Link `account` to a verified identity
    pub fn link(&self, account: Address, identity: IdentityId) {
        self.respond(account, MockResponse::Identity(identity));
    }

    /// Remove any scripted response; the account reads as unlinked again
    pub fn unlink(&self, account: &Address) {
        let mut responses = self.responses.write().unwrap_or_else(PoisonError::into_inner);
        responses.remove(account);
    }

    /// Script an arbitrary response for `account`
    pub fn respond(&self, account: Address, response: MockResponse) {
        let mut responses = self.responses.write().unwrap_or_else(PoisonError::into_inner);
        responses.insert(account, response);
    }

    /// Make every call fail as if the registry were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `owner_identity` calls received
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn response_for(&self, account: &Address) -> Option<MockResponse> {
        let responses = self.responses.read().unwrap_or_else(PoisonError::into_inner);
        responses.get(account).cloned()
    }
}

impl Default for MockIdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityRegistry for MockIdentityRegistry {
    fn name(&self) -> &str {
        "mock_identity_registry"
    }

    async fn owner_identity(&self, account: Address) -> Result<Vec<u8>, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.offline.load(Ordering::SeqCst) {
            return Err(OracleError::ConnectionFailed {
                source: "mock registry offline".into(),
            });
        }

        // The read guard is released before any scripted panic.
        match self.response_for(&account) {
            None => Ok(IdentityId::NONE.encode()),
            Some(MockResponse::Identity(id)) => Ok(id.encode()),
            Some(MockResponse::Raw(bytes)) => Ok(bytes),
            Some(MockResponse::Revert(reason)) => Err(OracleError::reverted(reason)),
            Some(MockResponse::Panic) => panic!("mock registry panicked for {account}"),
            Some(MockResponse::Hang) => std::future::pending().await,
        }
    }
}
