#![forbid(unsafe_code)]

use tokio::sync::broadcast;

use crate::Event;

/// Default broadcast channel capacity when none is configured.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Shared event bus for one playback session.
///
/// Every component holds a clone and publishes into the same channel;
/// subscribers each get an independent receiver over the unified [`Event`]
/// stream. Publishing is synchronous and never blocks: with no subscribers
/// the event is dropped, and a slow subscriber lags (sees
/// `RecvError::Lagged`) instead of back-pressuring publishers.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    /// Create a bus with the given channel capacity (clamped to at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Accepts anything convertible into [`Event`], so family values can be
    /// passed directly: `bus.publish(SessionEvent::Stopped)`.
    pub fn publish<E: Into<Event>>(&self, event: E) {
        let _ = self.tx.send(event.into());
    }

    /// Subscribe to all events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
