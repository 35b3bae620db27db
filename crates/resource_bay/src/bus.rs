//! # Event Bus
//!
//! Bounded channel transport for [`BayEvent`]s.
//!
//! ```text
//! ┌─────────────┐   publish   ┌─────────────┐   drain   ┌─────────────┐
//! │ ResourceBay │────────────>│  EventBus   │──────────>│ Subscribers │
//! │  (engine)   │ (no block)  │  (bounded)  │           │ (UI, audit) │
//! └─────────────┘             └─────────────┘           └─────────────┘
//! ```
//!
//! The engine side never blocks: a full channel drops the event and the
//! sender reports [`SinkError::Full`], which the engine discards.

use bay_shared::BayEvent;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::error::SinkError;
use crate::telemetry::EventSink;

/// Default number of events in flight before new ones are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Event bus for engine notifications.
///
/// Pre-allocates a bounded channel to prevent unbounded memory growth when
/// nobody drains it.
pub struct EventBus {
    /// Sender end - handed to the engine.
    sender: Sender<BayEvent>,
    /// Receiver end - held by subscribers.
    receiver: Receiver<BayEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle (clone for multiple consumers).
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a new pair of sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<BayEvent>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// # Errors
    ///
    /// - `SinkError::Full` if the channel is at capacity (event dropped)
    /// - `SinkError::Disconnected` if every receiver is gone
    #[inline]
    pub fn send(&self, event: BayEvent) -> Result<(), SinkError> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SinkError::Full),
            Err(TrySendError::Disconnected(_)) => Err(SinkError::Disconnected),
        }
    }
}

impl EventSink for EventSender {
    fn publish(&self, event: &BayEvent) -> Result<(), SinkError> {
        self.send(event.clone())
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<BayEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    ///
    /// Returns an empty vector if nothing is pending.
    #[inline]
    pub fn drain(&self) -> Vec<BayEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    ///
    /// Returns `None` if no events are pending.
    #[inline]
    pub fn try_recv(&self) -> Option<BayEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bay_shared::{BayEventKind, ResourceKey};

    fn removed(key: &str) -> BayEvent {
        BayEvent::ResourceRemoved {
            key: ResourceKey::from(key),
        }
    }

    #[test]
    fn test_event_send_receive() {
        let bus = EventBus::new(100);
        let sender = bus.sender();
        let receiver = bus.receiver();

        assert!(sender.send(removed("water")).is_ok());
        assert!(receiver.has_events());

        let received = receiver.try_recv().unwrap();
        assert_eq!(received.kind(), BayEventKind::ResourceRemoved);
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_event_drain() {
        let (sender, receiver) = EventBus::create_pair(100);

        for _ in 0..10 {
            sender.publish(&removed("water")).unwrap();
        }

        let events = receiver.drain();
        assert_eq!(events.len(), 10);
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_full_channel_drops_without_blocking() {
        let (sender, receiver) = EventBus::create_pair(2);

        assert!(sender.send(removed("a")).is_ok());
        assert!(sender.send(removed("b")).is_ok());
        assert_eq!(sender.send(removed("c")), Err(SinkError::Full));
        assert_eq!(receiver.pending_count(), 2);
    }

    #[test]
    fn test_disconnected_receiver() {
        let bus = EventBus::new(4);
        let sender = bus.sender();
        drop(bus);

        assert_eq!(sender.publish(&removed("a")), Err(SinkError::Disconnected));
    }
}
