//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers **without waiting**
//! for their processing. Every subscriber gets a bounded queue and a [`BasicThread`] worker
//! named `subscriber:<name>`.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//! - No retries on per-subscriber queue overflow (events are dropped for that subscriber).
//!
//! ## Diagram
//! ```text
//!   Bus ──► listen() thread ──► emit(&Event)
//!                                   │             (Arc-clone per subscriber)
//!                                   ├──────────► [queue S1] ─► worker S1 ─► on_event()
//!                                   ├──────────► [queue S2] ─► worker S2 ─► on_event()
//!                                   └──────────► [queue SN] ─► worker SN ─► on_event()
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use threadvisor::{Event, EventKind, Subscribe, SubscriberSet};
//!
//! struct Printer;
//!
//! impl Subscribe for Printer {
//!     fn on_event(&self, ev: &Event) {
//!         println!("{:?}", ev.kind);
//!     }
//!     fn name(&self) -> &'static str { "printer" }
//! }
//!
//! let set = SubscriberSet::new(vec![Arc::new(Printer) as _])?;
//! set.emit(&Event::new(EventKind::ThreadStarted).with_thread("demo"));
//! set.shutdown();
//! # Ok::<(), threadvisor::ThreadError>(())
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError, SyncSender, TrySendError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use tokio::sync::broadcast::error::TryRecvError;

use super::Subscribe;
use crate::core::{BasicThread, panic_message};
use crate::error::ThreadError;
use crate::events::{Bus, Event};
use crate::workers::{ThreadContext, WorkerFn};

/// How long an idle subscriber worker waits before re-checking `terminating`.
const RECV_POLL: Duration = Duration::from_millis(20);

/// How long the bus listener sleeps when the bus is empty.
const LISTEN_POLL: Duration = Duration::from_millis(5);

/// Per-subscriber channel with metadata
struct SubscriberChannel {
    name: &'static str,
    sender: SyncSender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker threads.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<BasicThread>,
    bus: Option<Bus>,
}

impl SubscriberSet {
    /// Creates a new set and starts one worker thread per subscriber.
    ///
    /// Fails if the OS refuses to spawn a worker; workers started before that are stopped.
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Result<Self, ThreadError> {
        Self::build(subs, None)
    }

    /// Like [`new`](Self::new), additionally reporting subscriber panics and overflows on `bus`
    /// as [`EventKind::SubscriberPanicked`](crate::EventKind::SubscriberPanicked) and
    /// [`EventKind::SubscriberOverflow`](crate::EventKind::SubscriberOverflow).
    pub fn with_bus(subs: Vec<Arc<dyn Subscribe>>, bus: &Bus) -> Result<Self, ThreadError> {
        Self::build(subs, Some(bus.clone()))
    }

    fn build(subs: Vec<Arc<dyn Subscribe>>, bus: Option<Bus>) -> Result<Self, ThreadError> {
        let mut set = Self {
            channels: Vec::with_capacity(subs.len()),
            workers: Vec::with_capacity(subs.len()),
            bus,
        };

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, rx) = mpsc::sync_channel::<Arc<Event>>(cap);
            let rx = Mutex::new(rx);
            let report = set.bus.clone();

            let worker = WorkerFn::arc(move |ctx: &mut ThreadContext| {
                let rx = rx.lock().unwrap_or_else(PoisonError::into_inner);
                loop {
                    match rx.recv_timeout(RECV_POLL) {
                        Ok(ev) => deliver(sub.as_ref(), &ev, report.as_ref()),
                        Err(RecvTimeoutError::Timeout) => {
                            if ctx.terminating() {
                                break;
                            }
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            });

            let mut t = BasicThread::builder(worker)
                .name(format!("subscriber:{name}"))
                .build();
            if let Err(e) = t.start() {
                set.shutdown();
                return Err(e);
            }

            set.channels.push(SubscriberChannel { name, sender: tx });
            set.workers.push(t);
        }

        Ok(set)
    }

    /// Fan-out one event to all subscribers (non-blocking).
    ///
    /// If a subscriber's queue is **full** or **closed**, the event is dropped for it and a
    /// warning is logged with the subscriber's name.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => continue,
                Err(TrySendError::Full(_)) => "full",
                Err(TrySendError::Disconnected(_)) => "closed",
            };
            eprintln!(
                "[threadvisor] subscriber '{}' dropped event: queue {reason}",
                channel.name
            );
            // Never re-report subscriber events.
            if let Some(bus) = &self.bus {
                if !event.is_subscriber_event() {
                    bus.publish(Event::subscriber_overflow(channel.name, reason));
                }
            }
        }
    }

    /// Starts a thread that forwards every event published on `bus` to this set.
    ///
    /// The listener subscribes before returning, so nothing published afterwards is missed
    /// (unless the bus ring overflows, which is logged). Stopping the returned instance drains
    /// what is already buffered and exits. The listener keeps a reference to the set until it
    /// is dropped.
    pub fn listen(self: &Arc<Self>, bus: &Bus) -> Result<BasicThread, ThreadError> {
        let rx = Mutex::new(bus.subscribe());
        let set = Arc::clone(self);

        let worker = WorkerFn::arc(move |ctx: &mut ThreadContext| {
            let mut rx = rx.lock().unwrap_or_else(PoisonError::into_inner);
            loop {
                match rx.try_recv() {
                    Ok(ev) => set.emit(&ev),
                    Err(TryRecvError::Empty) => {
                        if ctx.terminating() {
                            break;
                        }
                        thread::sleep(LISTEN_POLL);
                    }
                    Err(TryRecvError::Lagged(n)) => {
                        eprintln!("[threadvisor] subscriber listener lagged, {n} events lost");
                    }
                    Err(TryRecvError::Closed) => break,
                }
            }
        });

        let mut t = BasicThread::builder(worker)
            .name("subscriber-listener")
            .build();
        t.start()?;
        Ok(t)
    }

    /// Graceful shutdown: close all queues and join the workers.
    ///
    /// Events already queued are still delivered.
    pub fn shutdown(mut self) {
        self.channels.clear();
        for w in &mut self.workers {
            w.stop();
            w.join();
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

fn deliver(sub: &dyn Subscribe, ev: &Event, bus: Option<&Bus>) {
    let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| sub.on_event(ev))) else {
        return;
    };
    let info = panic_message(payload.as_ref());
    eprintln!("[threadvisor] subscriber '{}' panicked: {info}", sub.name());
    if let Some(bus) = bus {
        if !ev.is_subscriber_event() {
            bus.publish(Event::subscriber_panicked(sub.name(), info));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Instant;

    #[derive(Default)]
    struct Collector {
        seen: Mutex<Vec<EventKind>>,
    }

    impl Collector {
        fn kinds(&self) -> Vec<EventKind> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Subscribe for Collector {
        fn on_event(&self, event: &Event) {
            self.seen.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "collector"
        }
    }

    struct Exploding;

    impl Subscribe for Exploding {
        fn on_event(&self, _event: &Event) {
            panic!("subscriber exploded");
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    struct Stalled {
        released: AtomicBool,
    }

    impl Subscribe for Stalled {
        fn on_event(&self, _event: &Event) {
            let deadline = Instant::now() + Duration::from_secs(5);
            while !self.released.load(Ordering::Acquire) && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(1));
            }
        }

        fn name(&self) -> &'static str {
            "stalled"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        cond()
    }

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    #[test]
    fn test_empty_set() {
        let set = SubscriberSet::new(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        set.emit(&Event::new(EventKind::ThreadStarted));
        set.shutdown();
    }

    #[test]
    fn test_emit_preserves_per_subscriber_order() {
        let col = Arc::new(Collector::default());
        let set = SubscriberSet::new(vec![col.clone() as Arc<dyn Subscribe>]).unwrap();
        assert_eq!(set.len(), 1);

        set.emit(&Event::new(EventKind::ThreadStarted));
        set.emit(&Event::new(EventKind::StopRequested));
        set.emit(&Event::new(EventKind::ThreadJoined));
        set.shutdown();

        assert_eq!(
            col.kinds(),
            vec![
                EventKind::ThreadStarted,
                EventKind::StopRequested,
                EventKind::ThreadJoined
            ]
        );
    }

    #[test]
    fn test_panicking_subscriber_is_isolated() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let col = Arc::new(Collector::default());
        let set = SubscriberSet::with_bus(
            vec![Arc::new(Exploding) as Arc<dyn Subscribe>, col.clone()],
            &bus,
        )
        .unwrap();

        set.emit(&Event::new(EventKind::ThreadStarted));
        set.emit(&Event::new(EventKind::ThreadJoined));
        set.shutdown();

        assert_eq!(
            col.kinds(),
            vec![EventKind::ThreadStarted, EventKind::ThreadJoined]
        );
        let panics: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(|e| e.kind == EventKind::SubscriberPanicked)
            .collect();
        assert_eq!(panics.len(), 2);
        assert_eq!(panics[0].thread.as_deref(), Some("exploding"));
        assert_eq!(panics[0].reason.as_deref(), Some("subscriber exploded"));
    }

    #[test]
    fn test_full_queue_drops_and_reports_overflow() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let stalled = Arc::new(Stalled {
            released: AtomicBool::new(false),
        });
        let set = SubscriberSet::with_bus(vec![stalled.clone() as Arc<dyn Subscribe>], &bus)
            .unwrap();

        // One event in flight plus one queued; the rest must overflow.
        for _ in 0..4 {
            set.emit(&Event::new(EventKind::ThreadStarted));
        }
        stalled.released.store(true, Ordering::Release);
        set.shutdown();

        let overflows: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(|e| e.kind == EventKind::SubscriberOverflow)
            .collect();
        assert!(overflows.len() >= 2);
        assert!(overflows.iter().all(|e| e.thread.as_deref() == Some("stalled")));
        assert!(overflows.iter().all(|e| e.reason.as_deref() == Some("full")));
    }

    #[test]
    fn test_subscriber_events_are_not_reported_again() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let stalled = Arc::new(Stalled {
            released: AtomicBool::new(false),
        });
        let set = SubscriberSet::with_bus(vec![stalled.clone() as Arc<dyn Subscribe>], &bus)
            .unwrap();

        for _ in 0..4 {
            set.emit(&Event::subscriber_overflow("other", "full"));
        }
        stalled.released.store(true, Ordering::Release);
        set.shutdown();

        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_listen_forwards_bus_events() {
        let bus = Bus::new(64);
        let col = Arc::new(Collector::default());
        let set = Arc::new(SubscriberSet::new(vec![col.clone() as Arc<dyn Subscribe>]).unwrap());

        let mut listener = set.listen(&bus).unwrap();
        bus.publish(Event::new(EventKind::ThreadStarted));
        bus.publish(Event::new(EventKind::ThreadExited));

        assert!(wait_for(|| col.kinds().len() == 2));
        assert_eq!(
            col.kinds(),
            vec![EventKind::ThreadStarted, EventKind::ThreadExited]
        );

        listener.stop();
        listener.join();
        drop(listener);

        let set = Arc::try_unwrap(set).ok().unwrap();
        set.shutdown();
    }

    #[test]
    fn test_listen_drains_buffered_events_on_stop() {
        let bus = Bus::new(64);
        let col = Arc::new(Collector::default());
        let set = Arc::new(SubscriberSet::new(vec![col.clone() as Arc<dyn Subscribe>]).unwrap());

        let mut listener = set.listen(&bus).unwrap();
        for _ in 0..10 {
            bus.publish(Event::new(EventKind::ThreadJoined));
        }
        listener.stop();
        listener.join();
        drop(listener);

        let set = Arc::try_unwrap(set).ok().unwrap();
        set.shutdown();
        assert_eq!(col.kinds().len(), 10);
    }

    #[test]
    fn test_workers_are_named_after_subscribers() {
        let set = SubscriberSet::new(vec![Arc::new(Collector::default()) as Arc<dyn Subscribe>])
            .unwrap();
        assert_eq!(set.workers[0].name(), "subscriber:collector");
        assert!(set.workers[0].is_started());
        set.shutdown();
    }
}
