//! In-process publish/subscribe for streaming events.
//!
//! Each adapter instance owns its own [`EventBus`]; subscriber state is
//! never shared between adapters, so a testnet and a mainnet instance can
//! stream side by side. Decode paths publish, caller-registered callbacks
//! consume. There is no unsubscription, no replay, and no queueing: delivery
//! is synchronous on the publishing task, in registration order.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Order, Position, Trade};

/// Named channels on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Public trade tape.
    Trades,
    /// Private order updates.
    Orders,
    /// Private position updates.
    Positions,
}

/// A decoded push event.
///
/// Venues batch several prints into one frame, so every variant carries a
/// Vec even when it usually holds a single element.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Trades(Vec<Trade>),
    Orders(Vec<Order>),
    Positions(Vec<Position>),
}

/// Callback registered for a topic.
pub type EventCallback = Arc<dyn Fn(&StreamEvent) + Send + Sync>;

/// Per-adapter-instance topic registry.
///
/// Publishing snapshots the callback list before invoking anything, so user
/// code never runs while the registry lock is held: a callback may re-enter
/// `subscribe` or `publish` without deadlocking.
#[derive(Default)]
pub struct EventBus {
    registry: Mutex<HashMap<Topic, Vec<EventCallback>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `callback` to the topic's list. No de-duplication, no replay
    /// of past events; registrations live as long as the bus.
    pub fn subscribe<F>(&self, topic: Topic, callback: F)
    where
        F: Fn(&StreamEvent) + Send + Sync + 'static,
    {
        self.registry
            .lock()
            .entry(topic)
            .or_default()
            .push(Arc::new(callback));
    }

    /// Invoke every callback registered for `topic`, in registration order,
    /// on the calling task. A topic with no subscribers is a no-op.
    pub fn publish(&self, topic: Topic, event: &StreamEvent) {
        let snapshot: Vec<EventCallback> = {
            let registry = self.registry.lock();
            match registry.get(&topic) {
                Some(callbacks) => callbacks.clone(),
                None => return,
            }
        };

        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of callbacks currently registered for `topic`.
    #[must_use]
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.registry
            .lock()
            .get(&topic)
            .map_or(0, std::vec::Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("EventBus")
            .field("topics", &registry.len())
            .finish()
    }
}
