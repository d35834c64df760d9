//! # Lifecycle events emitted by thread instances and subscriber workers.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Lifecycle events**: the owner driving an instance (started, stop requested, joined, ...)
//!   and the worker reporting its own exit.
//! - **Subscriber events**: delivery problems inside a [`SubscriberSet`](crate::SubscriberSet).
//!
//! The [`Event`] struct carries additional metadata such as timestamps, thread name and reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use threadvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ThreadPanicked)
//!     .with_thread("reader")
//!     .with_reason("index out of bounds");
//!
//! assert_eq!(ev.kind, EventKind::ThreadPanicked);
//! assert_eq!(ev.thread.as_deref(), Some("reader"));
//! assert_eq!(ev.reason.as_deref(), Some("index out of bounds"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `thread`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `thread`: subscriber name
    /// - `reason`: `"full"` or `"closed"`
    SubscriberOverflow,

    // === Owner-side lifecycle events ===
    /// The execution context was spawned.
    ///
    /// Sets:
    /// - `thread`: instance name
    ThreadStarted,

    /// The OS refused to spawn the execution context.
    ///
    /// Sets:
    /// - `thread`: instance name
    /// - `reason`: OS error
    SpawnFailed,

    /// `prepare_stop()` ran.
    ///
    /// Sets:
    /// - `thread`: instance name
    StopPrepared,

    /// `stop()` raised the terminating flag.
    ///
    /// Sets:
    /// - `thread`: instance name
    StopRequested,

    /// `join()` observed that `kill()` closed the termination gate.
    ///
    /// Published by `join()` rather than `kill()`, which must stay signal-safe.
    ///
    /// Sets:
    /// - `thread`: instance name
    ThreadKilled,

    /// `join()` observed that the entry routine panicked.
    ///
    /// Sets:
    /// - `thread`: instance name
    /// - `reason`: panic message
    ThreadPanicked,

    /// A killed context did not finish within the kill grace and was detached.
    ///
    /// Sets:
    /// - `thread`: instance name
    /// - `grace_ms`: configured kill grace (ms)
    JoinAbandoned,

    /// `join()` completed; the instance may be destroyed.
    ///
    /// Sets:
    /// - `thread`: instance name
    ThreadJoined,

    // === Worker-side lifecycle events ===
    /// The entry routine returned (or unwound) and the completion hook fired.
    ///
    /// Sets:
    /// - `thread`: instance name
    /// - `reason`: `"panicked"` when the routine unwound
    ThreadExited,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the thread instance (or subscriber), if applicable.
    pub thread: Option<Arc<str>>,
    /// Human-readable reason (errors, panic payloads, overflow details).
    pub reason: Option<Arc<str>>,
    /// Kill grace in milliseconds (compact).
    pub grace_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            thread: None,
            reason: None,
            grace_ms: None,
        }
    }

    /// Attaches a thread name.
    #[inline]
    pub fn with_thread(mut self, thread: impl Into<Arc<str>>) -> Self {
        self.thread = Some(thread.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a grace duration (stored as milliseconds).
    #[inline]
    pub fn with_grace(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.grace_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_thread(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_thread(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}
