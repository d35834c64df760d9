//! # threadvisor
//!
//! **Threadvisor** wraps one OS thread per instance with a strict, owner-driven lifecycle:
//! create, start, prepare to stop, stop cooperatively, kill as a last resort, join.
//!
//! Out-of-order calls are silent no-ops, termination flags only ever go from `false` to
//! `true`, and `kill()` is safe to call from a signal handler. The crate is a building block
//! for long-running services that own a handful of dedicated worker threads.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        owner thread                              worker thread (one per instance)
//! ┌──────────────────────────┐                ┌──────────────────────────────────────┐
//! │  BasicThread             │   start()      │  launcher                            │
//! │  - name, ThreadConfig    │ ─────────────► │  - block async signals               │
//! │  - prepare_stop/stop     │                │  - Worker::run(&mut ThreadContext)   │
//! │  - join (bounded if      │                │      ├─ polls ctx.terminating()      │
//! │    killed)               │                │      ├─ ctx.set_os_name(..)          │
//! └──────┬───────────────────┘                │      └─ ctx.fmt(..)/strerror(..)     │
//!        │ kill_switch()                      │  - completion hook (return/unwind)   │
//!        ▼                                    └──────────────────┬───────────────────┘
//! ┌──────────────────────────┐                                   │
//! │  KillSwitch (signal-safe)│──► Control ◄──────────────────────┘
//! └──────────────────────────┘    - terminating / killed flags
//!                                 - TerminationGate (Exited xor Killed)
//!
//!   BasicThread ── publish(Event) ──► Bus ──► SubscriberSet::listen() ──► Subscribe::on_event
//! ```
//!
//! ### Lifecycle
//! ```text
//! Created ──start()──► Started ──prepare_stop()──► StopRequested ──stop()──► Terminating
//!                         │                                                      │
//!                         └──────────────── worker returns ──────────────────────┤
//!                                                                                ▼
//!                           kill() from any state after start ──► Killed      Exited
//!                                                                   │            │
//!                                                                   └──join()────┴──► Joined
//! ```
//!
//! ## Features
//! | Area               | Description                                                        | Key types / traits                         |
//! |--------------------|--------------------------------------------------------------------|--------------------------------------------|
//! | **Threads**        | Owner handle with a strict start/stop/kill/join lifecycle.         | [`BasicThread`], [`ThreadBuilder`]          |
//! | **Workers**        | Entry routine plus optional lifecycle hooks.                       | [`Worker`], [`WorkerFn`], [`WorkerRef`]     |
//! | **Worker context** | Termination flags, OS naming and per-thread scratch buffers.       | [`ThreadContext`], [`Scratch`]              |
//! | **Kill switch**    | Async-signal-safe forced termination from any thread.              | [`KillSwitch`]                              |
//! | **Subscriber API** | Hook into lifecycle events (logging, metrics, custom subscribers). | [`Subscribe`], [`SubscriberSet`], [`Bus`]   |
//! | **Errors**         | Typed errors for spawning and naming threads.                      | [`ThreadError`]                             |
//! | **Configuration**  | Per-instance stack size, kill grace and signal masking.            | [`ThreadConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use threadvisor::{Bus, BasicThread, SubscriberSet, ThreadContext, ThreadExit, WorkerFn};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn threadvisor::Subscribe>> = vec![Arc::new(threadvisor::LogWriter)];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn threadvisor::Subscribe>> = Vec::new();
//!
//!     let bus = Bus::default();
//!     let set = Arc::new(SubscriberSet::new(subs)?);
//!     let mut listener = set.listen(&bus)?;
//!
//!     let mut ticker = BasicThread::builder(WorkerFn::arc(|ctx: &mut ThreadContext| {
//!         ctx.set_os_name("ticker");
//!         while !ctx.terminating() {
//!             std::thread::sleep(Duration::from_millis(5));
//!         }
//!     }))
//!     .name("ticker")
//!     .bus(bus.clone())
//!     .build();
//!
//!     ticker.start()?;
//!     ticker.prepare_stop();
//!     ticker.stop();
//!     ticker.join();
//!     assert_eq!(ticker.exit(), Some(ThreadExit::Returned));
//!
//!     listener.stop();
//!     listener.join();
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod scratch;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use crate::core::{
    BasicThread, KillSwitch, ThreadBuilder, ThreadConfig, ThreadExit, ThreadState,
};
pub use error::ThreadError;
pub use events::{Bus, Event, EventKind};
pub use scratch::Scratch;
pub use subscribers::{Subscribe, SubscriberSet};
pub use workers::{ThreadContext, Worker, WorkerFn, WorkerRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
