//! Event bus for cache updates using tokio::broadcast
//!
//! Subscribers (list views, detail views, the CLI) re-read their current
//! fingerprint when an event arrives; background refetches and invalidation
//! become visible this way.

use tokio::sync::broadcast;

use crate::fingerprint::Fingerprint;

/// Events emitted by the query cache.
#[derive(Debug, Clone)]
pub enum QueryEvent {
    /// The entry holds fresh data.
    Updated(Fingerprint),
    /// A fetch exhausted its retries; the entry is errored.
    Errored(Fingerprint),
    /// The entry was marked stale by a mutation.
    Invalidated(Fingerprint),
}

impl QueryEvent {
    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            QueryEvent::Updated(fp) | QueryEvent::Errored(fp) | QueryEvent::Invalidated(fp) => fp,
        }
    }
}

/// Broadcast channel for [`QueryEvent`]s with multi-consumer support.
pub struct EventBus {
    sender: broadcast::Sender<QueryEvent>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (256 events).
    pub fn default_capacity() -> Self {
        Self::new(256)
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: QueryEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryEvent> {
        self.sender.subscribe()
    }

    /// Current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(QueryEvent::Updated(Fingerprint::Detail { id: 7 }));

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            QueryEvent::Updated(Fingerprint::Detail { id: 7 })
        ));
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::default_capacity();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(QueryEvent::Errored(Fingerprint::Detail { id: 1 }));

        assert!(matches!(rx1.recv().await.unwrap(), QueryEvent::Errored(_)));
        assert!(matches!(rx2.recv().await.unwrap(), QueryEvent::Errored(_)));
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default_capacity();
        // Should not panic even with no subscribers
        bus.publish(QueryEvent::Updated(Fingerprint::Detail { id: 1 }));
    }
}
