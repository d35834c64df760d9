//! # BasicThread: owner handle of a cooperatively-terminable worker thread.
//!
//! A [`BasicThread`] maps to exactly one OS thread for its whole life. The owner drives it
//! through a single valid path; every call made out of order is a silent no-op.
//!
//! ## Lifecycle
//! ```text
//! new()/builder() ─► Created
//!        start() ─► spawn OS thread running Worker::run ─► Started   (on_start)
//! prepare_stop() ─► StopRequested                                    (on_prepare_stop)
//!         stop() ─► terminating = true ─► Terminating                (on_stop)
//!                           │
//!            worker polls terminating, returns
//!                           ▼
//!                completion hook closes gate ─► Exited
//!
//!         kill() ─► terminating = killed = true, gate closed ─► Killed   (on_kill)
//!
//!         join() ─► Exited: wait for the OS thread              ─┐
//!                   Killed: wait ≤ kill_grace, else detach        ├─► Joined
//!                   never started / already joined: no-op        ─┘
//! ```
//!
//! ## Rules
//! - Owner operations take `&mut self`: exactly one owner drives the lifecycle.
//! - `start()` spawns at most one OS thread; later calls are no-ops.
//! - `terminating`/`killed` only go `false → true`.
//! - `kill()` (and [`KillSwitch::kill`]) is async-signal-safe and may run concurrently with
//!   the owner, including while the owner is blocked in `join()`.
//! - `join()` is the only blocking call and is bounded once `kill()` has closed the gate.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use threadvisor::{BasicThread, ThreadContext, ThreadState, WorkerFn};
//!
//! let mut t = BasicThread::builder(WorkerFn::arc(|ctx: &mut ThreadContext| {
//!     while !ctx.terminating() {
//!         std::thread::sleep(Duration::from_millis(5));
//!     }
//! }))
//! .name("ticker")
//! .build();
//!
//! t.start()?;
//! t.prepare_stop();
//! t.stop();
//! t.join();
//!
//! assert_eq!(t.state(), ThreadState::Joined);
//! assert!(!t.is_killed());
//! # Ok::<(), threadvisor::ThreadError>(())
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::config::ThreadConfig;
use super::control::{Control, KillSwitch};
use super::gate::GateState;
use super::launcher;
use super::state::{ThreadExit, ThreadState};
use crate::error::ThreadError;
use crate::events::{Bus, Event, EventKind};
use crate::workers::WorkerRef;

/// Process-wide counter for default names.
static THREAD_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Re-check interval of `join()` while the gate is open.
const JOIN_POLL: Duration = Duration::from_millis(5);

fn next_default_name() -> Arc<str> {
    let n = THREAD_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    Arc::from(format!("thread-{n}"))
}

/// Owner handle of one worker thread.
///
/// See the [module docs](self) for the lifecycle.
pub struct BasicThread {
    name: Arc<str>,
    cfg: ThreadConfig,
    control: Arc<Control>,
    bus: Option<Bus>,
    handle: Option<JoinHandle<()>>,
    prepared: bool,
    joined: bool,
    exit: Option<ThreadExit>,
}

impl BasicThread {
    /// Creates an instance with a default name and default configuration.
    ///
    /// No OS thread exists until [`start`](Self::start).
    pub fn new(worker: WorkerRef) -> Self {
        Self::builder(worker).build()
    }

    /// Returns a builder for naming and configuring an instance.
    pub fn builder(worker: WorkerRef) -> ThreadBuilder {
        ThreadBuilder::new(worker)
    }

    /// Descriptive name (`thread-<n>` unless set explicitly).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the descriptive name. Ignored once the instance was started.
    pub fn set_name(&mut self, name: impl Into<Arc<str>>) {
        if self.control.started() {
            return;
        }
        self.name = name.into();
    }

    /// Configuration the instance was built with.
    pub fn config(&self) -> &ThreadConfig {
        &self.cfg
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ThreadState {
        if self.joined {
            return ThreadState::Joined;
        }
        if !self.control.started() {
            return ThreadState::Created;
        }
        match self.control.gate_state() {
            GateState::Killed => ThreadState::Killed,
            GateState::Exited => ThreadState::Exited,
            GateState::Open if self.control.terminating() => ThreadState::Terminating,
            GateState::Open if self.prepared => ThreadState::StopRequested,
            GateState::Open => ThreadState::Started,
        }
    }

    /// Returns true once `start()` spawned the OS thread.
    pub fn is_started(&self) -> bool {
        self.control.started()
    }

    /// Returns true once `stop()` or `kill()` took effect.
    pub fn is_terminating(&self) -> bool {
        self.control.terminating()
    }

    /// Returns true once `kill()` took effect.
    pub fn is_killed(&self) -> bool {
        self.control.killed()
    }

    /// How the context ended; `None` until `join()` completed.
    pub fn exit(&self) -> Option<ThreadExit> {
        self.exit
    }

    /// Returns a signal-safe handle that can kill this instance from anywhere.
    ///
    /// The switch takes effect from the moment `start()` begins spawning the OS thread;
    /// before that, `kill()` is a no-op.
    pub fn kill_switch(&self) -> KillSwitch {
        KillSwitch::new(Arc::clone(&self.control))
    }

    /// Spawns the OS thread and runs the worker's entry routine on it.
    ///
    /// Calling `start()` again is a no-op. `Err` is returned only if the OS refused to create
    /// the thread, in which case the instance stays in [`ThreadState::Created`].
    pub fn start(&mut self) -> Result<(), ThreadError> {
        if self.control.started() || self.joined {
            return Ok(());
        }

        // `started` is visible before the worker runs.
        self.control.mark_started();
        let spawned = launcher::spawn(&self.name, &self.cfg, &self.control, self.bus.clone());
        let handle = match spawned {
            Ok(handle) => handle,
            Err(source) => {
                self.control.clear_started();
                let err = ThreadError::Spawn {
                    name: Arc::clone(&self.name),
                    source,
                };
                self.publish(Event::new(EventKind::SpawnFailed).with_reason(err.to_string()));
                return Err(err);
            }
        };

        self.handle = Some(handle);
        self.control.worker().on_start();
        self.publish(Event::new(EventKind::ThreadStarted));
        Ok(())
    }

    /// Lets the owner prepare for stopping before the worker is told anything.
    ///
    /// Runs [`Worker::on_prepare_stop`](crate::Worker::on_prepare_stop) once.
    /// No-op if never started.
    pub fn prepare_stop(&mut self) {
        if !self.control.started() || self.prepared {
            return;
        }
        self.prepared = true;
        self.control.worker().on_prepare_stop();
        self.publish(Event::new(EventKind::StopPrepared));
    }

    /// Asks the worker to stop by raising `terminating`. Does not block.
    ///
    /// Exiting is up to the worker. No-op if never started or already terminating.
    pub fn stop(&mut self) {
        if !self.control.started() || !self.control.request_stop() {
            return;
        }
        self.control.worker().on_stop();
        self.publish(Event::new(EventKind::StopRequested));
    }

    /// Kills the instance immediately. `join()` must still be called afterwards.
    ///
    /// Async-signal-safe; publishes nothing (see [`EventKind::ThreadKilled`]).
    pub fn kill(&self) {
        self.control.kill();
    }

    /// Waits for the execution context to end (or gives up on it), then moves to
    /// [`ThreadState::Joined`].
    ///
    /// - natural exit: blocks until the OS thread finished
    /// - after `kill()`: waits at most [`ThreadConfig::kill_grace`], then detaches. A context
    ///   reported as [`ThreadExit::Abandoned`] may still be running after `join()` returns;
    ///   it only holds its own reference to the shared state.
    /// - never started or already joined: returns immediately
    pub fn join(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.control.register_joiner(thread::current());

        let exit = loop {
            match self.control.gate_state() {
                GateState::Exited => break self.join_exited(handle),
                GateState::Killed => break self.join_killed(handle),
                GateState::Open => thread::park_timeout(JOIN_POLL),
            }
        };

        self.exit = Some(exit);
        self.joined = true;
        self.publish(Event::new(EventKind::ThreadJoined).with_reason(exit.as_label()));
    }

    fn join_exited(&self, handle: JoinHandle<()>) -> ThreadExit {
        match handle.join() {
            Ok(()) => ThreadExit::Returned,
            Err(payload) => {
                self.publish_panic(payload.as_ref());
                ThreadExit::Panicked
            }
        }
    }

    fn join_killed(&self, handle: JoinHandle<()>) -> ThreadExit {
        self.publish(Event::new(EventKind::ThreadKilled).with_grace(self.cfg.kill_grace));

        if let Some(grace) = self.cfg.kill_grace_limit() {
            let deadline = Instant::now() + grace;
            while !handle.is_finished() {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::park_timeout((deadline - now).min(JOIN_POLL));
            }
        }

        if !handle.is_finished() {
            drop(handle);
            self.publish(Event::new(EventKind::JoinAbandoned).with_grace(self.cfg.kill_grace));
            return ThreadExit::Abandoned;
        }

        if let Err(payload) = handle.join() {
            self.publish_panic(payload.as_ref());
        }
        ThreadExit::Killed
    }

    fn publish_panic(&self, payload: &(dyn Any + Send)) {
        self.publish(Event::new(EventKind::ThreadPanicked).with_reason(panic_message(payload)));
    }

    fn publish(&self, ev: Event) {
        if let Some(bus) = &self.bus {
            bus.publish(ev.with_thread(Arc::clone(&self.name)));
        }
    }
}

impl Drop for BasicThread {
    fn drop(&mut self) {
        // Dropped before join: ask the worker to stop and detach it.
        if self.handle.take().is_some() {
            self.control.request_stop();
        }
    }
}

impl fmt::Debug for BasicThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicThread")
            .field("name", &self.name)
            .field("state", &self.state())
            .field("terminating", &self.is_terminating())
            .field("killed", &self.is_killed())
            .field("exit", &self.exit)
            .finish()
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Builder for [`BasicThread`].
pub struct ThreadBuilder {
    worker: WorkerRef,
    name: Option<Arc<str>>,
    cfg: ThreadConfig,
    bus: Option<Bus>,
}

impl ThreadBuilder {
    /// Creates a builder with default configuration and no event bus.
    pub fn new(worker: WorkerRef) -> Self {
        Self {
            worker,
            name: None,
            cfg: ThreadConfig::default(),
            bus: None,
        }
    }

    /// Sets the descriptive name; a default `thread-<n>` name is generated otherwise.
    pub fn name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the configuration.
    pub fn config(mut self, cfg: ThreadConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Publishes lifecycle events of the instance to `bus`.
    pub fn bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds the instance. No OS thread is spawned.
    pub fn build(self) -> BasicThread {
        BasicThread {
            name: self.name.unwrap_or_else(next_default_name),
            cfg: self.cfg,
            control: Control::new(self.worker),
            bus: self.bus,
            handle: None,
            prepared: false,
            joined: false,
            exit: None,
        }
    }
}
