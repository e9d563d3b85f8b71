//! Application context - wires everything together

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use idtoken_bus::EventLogger;
use idtoken_core::Address;
use idtoken_ledger::{LedgerBuilder, TokenConfig, TokenLedger};
use idtoken_oracle::MockIdentityRegistry;
use tokio::task::JoinHandle;

use crate::script::Script;

/// Application context - ledger, its mock registry and the event logger
pub struct AppContext {
    pub ledger: TokenLedger,
    pub registry: Arc<MockIdentityRegistry>,
    labels: HashMap<Address, String>,
    logger: JoinHandle<()>,
}

impl AppContext {
    /// Build a ledger from `config` and seed its registry from `script`
    pub fn new(config: TokenConfig, script: &Script) -> Self {
        let registry = Arc::new(MockIdentityRegistry::new());
        for (account, response) in script.seed() {
            registry.respond(account, response);
        }

        let ledger = LedgerBuilder::new()
            .with_config(config)
            .with_registry(registry.clone())
            .build();
        let logger = ledger.bus().attach(Arc::new(EventLogger));

        Self {
            ledger,
            registry,
            labels: script.labels(),
            logger,
        }
    }

    /// Load the token config, or fall back to defaults
    pub fn load_config(path: Option<&Path>) -> anyhow::Result<TokenConfig> {
        match path {
            Some(path) => TokenConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(TokenConfig::default()),
        }
    }

    /// Script label for `account`, or its hex form
    pub fn label(&self, account: &Address) -> String {
        self.labels
            .get(account)
            .cloned()
            .unwrap_or_else(|| account.to_string())
    }

    /// Stop the event logger
    pub fn shutdown(self) {
        self.logger.abort();
    }
}
