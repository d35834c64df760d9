//! # Control block shared between the owner and the worker.
//!
//! [`Control`] holds the only state that crosses the owner/worker boundary:
//!
//! ```text
//!   owner (BasicThread)            worker (ThreadContext)        signal handler (KillSwitch)
//!        │ start/stop/join               │ terminating()/killed()        │ kill()
//!        └──────────────┬────────────────┴───────────────┬───────────────┘
//!                       ▼                                ▼
//!        started · terminating · killed (AtomicBool)   TerminationGate (AtomicU8)
//! ```
//!
//! ## Rules
//! - Flags only ever go `false → true` (Release store, Acquire load).
//! - `kill` is reachable from signal handlers: atomics only, no locks, no allocation.
//! - The worker only reads the flags; the completion hook is its only write (the gate).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::Thread;

use super::gate::{GateState, TerminationGate};
use crate::workers::WorkerRef;

pub(crate) struct Control {
    started: AtomicBool,
    terminating: AtomicBool,
    killed: AtomicBool,
    gate: TerminationGate,
    worker: WorkerRef,
    /// Owner thread blocked in `join()`, woken by the completion hook.
    joiner: OnceLock<Thread>,
}

impl Control {
    pub(crate) fn new(worker: WorkerRef) -> Arc<Self> {
        Arc::new(Self {
            started: AtomicBool::new(false),
            terminating: AtomicBool::new(false),
            killed: AtomicBool::new(false),
            gate: TerminationGate::new(),
            worker,
            joiner: OnceLock::new(),
        })
    }

    #[inline]
    pub(crate) fn worker(&self) -> &WorkerRef {
        &self.worker
    }

    #[inline]
    pub(crate) fn started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn terminating(&self) -> bool {
        self.terminating.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn killed(&self) -> bool {
        self.killed.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub(crate) fn mark_started(&self) {
        self.started.store(true, Ordering::Release);
    }

    /// Undoes `mark_started` after the OS refused to spawn the thread.
    ///
    /// A kill that landed in between keeps `terminating`/`killed` raised.
    pub(crate) fn clear_started(&self) {
        self.started.store(false, Ordering::Release);
    }

    /// Raises `terminating`. Returns `false` if it was already raised.
    pub(crate) fn request_stop(&self) -> bool {
        !self.terminating.swap(true, Ordering::AcqRel)
    }

    /// Async-signal-safe forced termination.
    ///
    /// No-op before start. `terminating` is stored before `killed` so a reader that sees
    /// `killed` also sees `terminating`.
    pub(crate) fn kill(&self) {
        if !self.started() {
            return;
        }
        self.terminating.store(true, Ordering::Release);
        self.killed.store(true, Ordering::Release);
        self.gate.close_killed();
        self.worker.on_kill();
    }

    /// Completion hook, run by the trampoline once the entry routine is over.
    pub(crate) fn done(&self) -> bool {
        let closed = self.gate.close_exited();
        if let Some(joiner) = self.joiner.get() {
            joiner.unpark();
        }
        closed
    }

    pub(crate) fn register_joiner(&self, joiner: Thread) {
        let _ = self.joiner.set(joiner);
    }
}

/// Cloneable, async-signal-safe handle for killing a thread instance.
///
/// Obtain one with [`BasicThread::kill_switch`](crate::BasicThread::kill_switch) before
/// installing a signal handler, store it somewhere the handler can reach (e.g. a
/// `OnceLock`), and call [`KillSwitch::kill`] from the handler. `kill` only touches atomics
/// and the worker's [`on_kill`](crate::Worker::on_kill) hook.
///
/// The owner must still call [`BasicThread::join`](crate::BasicThread::join) afterwards.
/// Do not drop the last clone inside a signal handler: dropping may free memory.
#[derive(Clone)]
pub struct KillSwitch {
    control: Arc<Control>,
}

impl KillSwitch {
    pub(crate) fn new(control: Arc<Control>) -> Self {
        Self { control }
    }

    /// Kills the instance. No-op if it was never started.
    #[inline]
    pub fn kill(&self) {
        self.control.kill();
    }

    /// Returns true once `kill()` took effect.
    #[inline]
    pub fn is_killed(&self) -> bool {
        self.control.killed()
    }

    /// Returns true once `stop()` or `kill()` took effect.
    #[inline]
    pub fn is_terminating(&self) -> bool {
        self.control.terminating()
    }
}

impl std::fmt::Debug for KillSwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KillSwitch")
            .field("terminating", &self.is_terminating())
            .field("killed", &self.is_killed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::{ThreadContext, WorkerFn};

    fn control() -> Arc<Control> {
        Control::new(WorkerFn::arc(|_ctx: &mut ThreadContext| {}))
    }

    #[test]
    fn test_kill_before_start_is_noop() {
        let c = control();
        c.kill();
        assert!(!c.terminating());
        assert!(!c.killed());
        assert_eq!(c.gate_state(), GateState::Open);
    }

    #[test]
    fn test_kill_implies_terminating() {
        let c = control();
        c.mark_started();
        c.kill();
        assert!(c.killed());
        assert!(c.terminating());
        assert_eq!(c.gate_state(), GateState::Killed);
        assert!(!c.done());
    }

    #[test]
    fn test_request_stop_reports_first_call_only() {
        let c = control();
        assert!(c.request_stop());
        assert!(!c.request_stop());
        assert!(c.terminating());
    }

    #[test]
    fn test_clear_started_makes_kill_a_noop_again() {
        let c = control();
        c.mark_started();
        c.clear_started();
        assert!(!c.started());
        c.kill();
        assert!(!c.killed());
        assert_eq!(c.gate_state(), GateState::Open);
    }

    #[test]
    fn test_kill_after_done_keeps_exit() {
        let c = control();
        c.mark_started();
        assert!(c.done());
        c.kill();
        assert!(c.killed());
        assert_eq!(c.gate_state(), GateState::Exited);
    }
}
