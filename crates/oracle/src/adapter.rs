//! Identity oracle adapter - the fault boundary around the registry
//!
//! ```text
//! is_identity_linked(account)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │ spawned task     │──► panic?   ──┐
//! │ owner_identity() │──► error?   ──┤
//! └────────┬─────────┘               │
//!          │ timeout / late? ────────┤
//!          ▼                         │
//! ┌──────────────────┐               │
//! │ decode 32 bytes  │──► malformed ─┤
//! └────────┬─────────┘               │
//!          ▼                         ▼
//!     non-zero → true             false
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use idtoken_core::Address;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::types::{IdentityId, IdentityRegistry};

/// Fail-closed, fault-contained wrapper around an [`IdentityRegistry`]
#[derive(Clone)]
pub struct IdentityOracleAdapter {
    registry: Option<Arc<dyn IdentityRegistry>>,
    timeout: Duration,
}

impl IdentityOracleAdapter {
    /// Create an adapter for `registry`
    pub fn new(registry: Arc<dyn IdentityRegistry>, config: &OracleConfig) -> Self {
        Self {
            registry: Some(registry),
            timeout: config.timeout(),
        }
    }

    /// Create an adapter with no registry; every lookup answers `false`
    pub fn disconnected() -> Self {
        Self {
            registry: None,
            timeout: OracleConfig::default().timeout(),
        }
    }

    /// Whether a registry is attached
    pub fn is_connected(&self) -> bool {
        self.registry.is_some()
    }

    /// Does `account` have a verified linked identity?
    ///
    /// Never fails: any registry failure is logged and answered with `false`.
    pub async fn is_identity_linked(&self, account: Address) -> bool {
        match self.lookup(account).await {
            Ok(identity) => {
                let linked = !identity.is_none();
                debug!(%account, %identity, linked, "Identity lookup completed");
                linked
            }
            Err(e) => {
                warn!(%account, error = %e, "Identity lookup failed, treating as unlinked");
                false
            }
        }
    }

    /// Query the registry and decode its answer, surfacing the failure cause.
    ///
    /// The call runs on its own task so a panic in the registry stays there.
    /// An answer arriving after the deadline counts as a timeout, even when a
    /// registry blocking its thread kept the timer from firing. Needs a
    /// runtime with the time driver enabled; without one the lookup fails
    /// with [`OracleError::TimerUnavailable`].
    pub async fn lookup(&self, account: Address) -> Result<IdentityId, OracleError> {
        let registry = self
            .registry
            .as_ref()
            .map(Arc::clone)
            .ok_or(OracleError::RegistryUnavailable)?;

        let deadline = Instant::now() + self.timeout;
        let task = tokio::spawn(async move { registry.owner_identity(account).await });
        let _guard = AbortOnDrop(task.abort_handle());

        // Timer construction panics when the runtime was built without time.
        let bounded = std::panic::catch_unwind(AssertUnwindSafe(|| {
            tokio::time::timeout_at(deadline, task)
        }))
        .map_err(|_| OracleError::TimerUnavailable)?;

        let raw = match bounded.await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => return Err(OracleError::Aborted(join_err.to_string())),
            Err(_) => return Err(self.timed_out()),
        };
        if Instant::now() > deadline {
            return Err(self.timed_out());
        }

        IdentityId::decode(&raw)
    }

    fn timed_out(&self) -> OracleError {
        OracleError::Timeout(self.timeout.as_millis() as u64)
    }
}

/// Aborts the registry task once the lookup finishes or is dropped
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl std::fmt::Debug for IdentityOracleAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityOracleAdapter")
            .field("registry", &self.registry.as_ref().map(|r| r.name().to_string()))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockIdentityRegistry, MockResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Answers "linked" only after blocking its thread for `delay`
    struct BlockingRegistry {
        delay: Duration,
    }

    #[async_trait]
    impl IdentityRegistry for BlockingRegistry {
        async fn owner_identity(&self, _account: Address) -> Result<Vec<u8>, OracleError> {
            std::thread::sleep(self.delay);
            Ok(IdentityId::from_u64(1).encode())
        }
    }

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Never answers; records when its pending call is dropped
    struct StalledRegistry {
        dropped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl IdentityRegistry for StalledRegistry {
        async fn owner_identity(&self, _account: Address) -> Result<Vec<u8>, OracleError> {
            let _flag = SetOnDrop(self.dropped.clone());
            std::future::pending().await
        }
    }

    fn adapter_with(registry: Arc<MockIdentityRegistry>) -> IdentityOracleAdapter {
        let config = OracleConfig {
            registry: Some(Address::from_label("registry")),
            timeout_ms: 50,
        };
        IdentityOracleAdapter::new(registry, &config)
    }

    #[tokio::test]
    async fn test_linked_account() {
        let registry = Arc::new(MockIdentityRegistry::new());
        let alice = Address::from_label("alice");
        registry.link(alice, IdentityId::from_u64(1));

        let adapter = adapter_with(registry);
        assert!(adapter.is_identity_linked(alice).await);
    }

    #[tokio::test]
    async fn test_zero_identity_is_unlinked() {
        let registry = Arc::new(MockIdentityRegistry::new());
        let adapter = adapter_with(registry);
        assert!(!adapter.is_identity_linked(Address::from_label("bob")).await);
    }

    #[tokio::test]
    async fn test_disconnected_adapter() {
        let adapter = IdentityOracleAdapter::disconnected();
        assert!(!adapter.is_connected());
        assert!(!adapter.is_identity_linked(Address::from_label("alice")).await);
        assert!(matches!(
            adapter.lookup(Address::from_label("alice")).await,
            Err(OracleError::RegistryUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_revert_is_contained() {
        let registry = Arc::new(MockIdentityRegistry::new());
        let alice = Address::from_label("alice");
        registry.respond(alice, MockResponse::Revert("boom".into()));

        let adapter = adapter_with(registry);
        assert!(!adapter.is_identity_linked(alice).await);
        assert!(matches!(
            adapter.lookup(alice).await,
            Err(OracleError::Reverted { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_response_is_contained() {
        let registry = Arc::new(MockIdentityRegistry::new());
        let alice = Address::from_label("alice");
        registry.respond(alice, MockResponse::Raw(vec![0xff; 7]));

        let adapter = adapter_with(registry);
        assert!(!adapter.is_identity_linked(alice).await);
        assert!(matches!(
            adapter.lookup(alice).await,
            Err(OracleError::MalformedResponse { actual: 7, .. })
        ));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let registry = Arc::new(MockIdentityRegistry::new());
        let alice = Address::from_label("alice");
        registry.respond(alice, MockResponse::Panic);

        let adapter = adapter_with(registry);
        assert!(!adapter.is_identity_linked(alice).await);
        assert!(matches!(
            adapter.lookup(alice).await,
            Err(OracleError::Aborted(_))
        ));
    }

    #[tokio::test]
    async fn test_hang_times_out() {
        let registry = Arc::new(MockIdentityRegistry::new());
        let alice = Address::from_label("alice");
        registry.respond(alice, MockResponse::Hang);

        let adapter = adapter_with(registry);
        assert!(!adapter.is_identity_linked(alice).await);
        assert!(matches!(
            adapter.lookup(alice).await,
            Err(OracleError::Timeout(50))
        ));
    }

    #[tokio::test]
    async fn test_offline_registry_is_contained() {
        let registry = Arc::new(MockIdentityRegistry::new());
        let alice = Address::from_label("alice");
        registry.link(alice, IdentityId::from_u64(9));
        registry.set_offline(true);

        let adapter = adapter_with(registry.clone());
        assert!(!adapter.is_identity_linked(alice).await);

        registry.set_offline(false);
        assert!(adapter.is_identity_linked(alice).await);
    }

    #[tokio::test]
    async fn test_late_answer_from_blocking_registry_times_out() {
        let registry = Arc::new(BlockingRegistry {
            delay: Duration::from_millis(200),
        });
        let config = OracleConfig {
            registry: None,
            timeout_ms: 50,
        };
        let adapter = IdentityOracleAdapter::new(registry, &config);
        let alice = Address::from_label("alice");

        assert!(!adapter.is_identity_linked(alice).await);
        assert!(matches!(
            adapter.lookup(alice).await,
            Err(OracleError::Timeout(50))
        ));
    }

    #[tokio::test]
    async fn test_fast_blocking_registry_still_answers() {
        let registry = Arc::new(BlockingRegistry {
            delay: Duration::from_millis(1),
        });
        let config = OracleConfig {
            registry: None,
            timeout_ms: 2_000,
        };
        let adapter = IdentityOracleAdapter::new(registry, &config);
        assert!(adapter.is_identity_linked(Address::from_label("alice")).await);
    }

    #[test]
    fn test_runtime_without_timers_fails_closed() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let registry = Arc::new(MockIdentityRegistry::new());
        let alice = Address::from_label("alice");
        registry.link(alice, IdentityId::from_u64(1));
        let adapter = adapter_with(registry);

        let linked = runtime.block_on(adapter.is_identity_linked(alice));
        assert!(!linked);
        assert!(matches!(
            runtime.block_on(adapter.lookup(alice)),
            Err(OracleError::TimerUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_dropped_lookup_cancels_registry_call() {
        let dropped = Arc::new(AtomicBool::new(false));
        let registry = Arc::new(StalledRegistry {
            dropped: dropped.clone(),
        });
        let config = OracleConfig {
            registry: None,
            timeout_ms: 60_000,
        };
        let adapter = IdentityOracleAdapter::new(registry, &config);

        let outer = tokio::time::timeout(
            Duration::from_millis(20),
            adapter.lookup(Address::from_label("alice")),
        )
        .await;
        assert!(outer.is_err());

        for _ in 0..50 {
            if dropped.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(dropped.load(Ordering::SeqCst));
    }
}
