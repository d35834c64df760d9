//! # Event bus for broadcasting lifecycle events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from many sources (owners and worker threads).
//! No async runtime is required: `send` is synchronous and receivers may poll
//! with `try_recv` from plain OS threads.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                      Subscribers:
//!   BasicThread (owner) ──┐
//!   launcher (worker)   ──┼──────► Bus ───────► SubscriberSet::listen ────► SubscriberSet
//!   BasicThread (owner) ──┘  (broadcast chan)   (listener thread)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no active subscribers at send time.
//! - **Not signal-safe**: publishing allocates; `kill()` never publishes.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for lifecycle events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately (send clones internally).
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Default ring buffer size.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Creates a new bus with the given channel capacity.
    ///
    /// The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// A receiver only gets events **sent after** it subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::ThreadStarted));
    }

    #[test]
    fn test_receiver_sees_events_after_subscribe() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::ThreadStarted));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::StopRequested).with_thread("w"));

        let ev = rx.try_recv().expect("one event");
        assert_eq!(ev.kind, EventKind::StopRequested);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_slow_receiver_lags() {
        let bus = Bus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..5 {
            bus.publish(Event::new(EventKind::ThreadExited));
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(3))));
    }
}
