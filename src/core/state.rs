//! Lifecycle states and exit outcomes of a thread instance.

use std::fmt;

/// Position of an instance in its lifecycle.
///
/// ```text
/// Created ─► Started ─► StopRequested ─► Terminating ─► { Exited, Killed } ─► Joined
/// ```
///
/// The state is derived from the instance's flags and termination gate, it is never stored
/// on its own. Steps may be skipped (`stop()` without `prepare_stop()`, `kill()` straight
/// from `Started`, a worker returning before it was asked to).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// Constructed; no execution context exists.
    Created,
    /// The execution context was spawned.
    Started,
    /// `prepare_stop()` ran; the worker has not been told anything yet.
    StopRequested,
    /// `stop()` or `kill()` raised the terminating flag.
    Terminating,
    /// The entry routine returned and the completion hook closed the gate.
    Exited,
    /// `kill()` closed the gate before the worker did.
    Killed,
    /// `join()` completed. Terminal.
    Joined,
}

impl ThreadState {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ThreadState::Created => "created",
            ThreadState::Started => "started",
            ThreadState::StopRequested => "stop_requested",
            ThreadState::Terminating => "terminating",
            ThreadState::Exited => "exited",
            ThreadState::Killed => "killed",
            ThreadState::Joined => "joined",
        }
    }

    /// True once the instance may be destroyed.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ThreadState::Joined)
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// How a joined execution context ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadExit {
    /// The entry routine returned normally.
    Returned,
    /// The entry routine panicked; the completion hook still fired.
    Panicked,
    /// `kill()` won the termination gate and the context finished within the kill grace.
    Killed,
    /// `kill()` won the termination gate and the context was detached without waiting
    /// (or did not finish within the kill grace).
    Abandoned,
}

impl ThreadExit {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ThreadExit::Returned => "returned",
            ThreadExit::Panicked => "panicked",
            ThreadExit::Killed => "killed",
            ThreadExit::Abandoned => "abandoned",
        }
    }

    /// True if the exit was forced by `kill()`.
    #[inline]
    pub fn is_forced(&self) -> bool {
        matches!(self, ThreadExit::Killed | ThreadExit::Abandoned)
    }
}

impl fmt::Display for ThreadExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
