//! In-process event bus backed by a tokio broadcast channel

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::BusError;
use crate::event::TokenEvent;
use crate::subscriber::EventSubscriber;

const DEFAULT_CAPACITY: usize = 1024;

/// Event bus for distributing ledger notifications
///
/// Cloning the bus yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TokenEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new event bus with the default buffer
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` events per slow subscriber
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of receivers. Having none is not an error.
    pub fn publish(&self, event: TokenEvent) -> usize {
        tracing::trace!(kind = event.kind(), amount = %event.amount(), "Publishing event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TokenEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Drive `subscriber` from a background task until the bus is dropped
    pub fn attach(&self, subscriber: Arc<dyn EventSubscriber>) -> JoinHandle<()> {
        let mut receiver = self.subscribe();

        tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        let err = BusError::Lagged(skipped);
                        tracing::warn!(subscriber = subscriber.name(), error = %err, "Subscriber lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                if let Err(e) = subscriber.handle(&event).await {
                    tracing::error!(
                        subscriber = subscriber.name(),
                        kind = event.kind(),
                        error = %e,
                        "Subscriber failed"
                    );
                }
            }

            tracing::debug!(subscriber = subscriber.name(), "Event bus closed");
        })
    }
}
