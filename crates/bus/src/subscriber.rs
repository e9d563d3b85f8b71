//! Event subscriber trait for async event handling

use crate::error::BusError;
use crate::event::TokenEvent;
use async_trait::async_trait;

/// Trait for event subscribers
///
/// Subscribers receive events from the event bus and process them asynchronously.
/// A failing subscriber is logged and keeps receiving; it never affects the ledger.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Get the subscriber name (for logging)
    fn name(&self) -> &str;

    /// Handle a token event
    async fn handle(&self, event: &TokenEvent) -> Result<(), BusError>;
}

/// Writes every event to the tracing log at INFO
pub struct EventLogger;

#[async_trait]
impl EventSubscriber for EventLogger {
    fn name(&self) -> &str {
        "event_logger"
    }

    async fn handle(&self, event: &TokenEvent) -> Result<(), BusError> {
        match event {
            TokenEvent::Transfer {
                from, to, amount, ..
            } => {
                tracing::info!(%from, %to, %amount, "Transfer");
            }
            TokenEvent::Approval {
                owner,
                spender,
                amount,
                ..
            } => {
                tracing::info!(%owner, %spender, %amount, "Approval");
            }
        }
        Ok(())
    }
}
