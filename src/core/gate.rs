//! # Termination gate: serializes natural exit against a concurrent kill.
//!
//! The gate starts `Open` and is closed exactly once:
//!
//! ```text
//!                 done()  (worker, after the entry routine)
//!          ┌────────────────────────────► Exited
//!   Open ──┤
//!          └────────────────────────────► Killed
//!                 kill()  (owner or signal handler)
//! ```
//!
//! ## Rules
//! - Both transitions are a single compare-and-swap from `Open`; exactly one side wins.
//! - If `done` wins, the context exited naturally and `kill` leaves it alone.
//! - If `kill` wins, the owner treats the context as torn down; the worker's later `done`
//!   is a no-op.
//! - Lock-free and allocation-free, so `close_killed` is async-signal-safe.

use std::sync::atomic::{AtomicU8, Ordering};

const OPEN: u8 = 0;
const EXITED: u8 = 1;
const KILLED: u8 = 2;

/// Observable state of a [`TerminationGate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateState {
    /// Neither side has closed the gate yet.
    Open,
    /// The worker's completion hook closed the gate.
    Exited,
    /// `kill()` closed the gate.
    Killed,
}

#[derive(Debug)]
pub(crate) struct TerminationGate {
    state: AtomicU8,
}

impl TerminationGate {
    pub(crate) const fn new() -> Self {
        Self {
            state: AtomicU8::new(OPEN),
        }
    }

    /// Closes the gate on behalf of the worker. Returns `true` if this call closed it.
    #[inline]
    pub(crate) fn close_exited(&self) -> bool {
        self.close(EXITED)
    }

    /// Closes the gate on behalf of `kill()`. Returns `true` if this call closed it.
    #[inline]
    pub(crate) fn close_killed(&self) -> bool {
        self.close(KILLED)
    }

    #[inline]
    pub(crate) fn state(&self) -> GateState {
        match self.state.load(Ordering::Acquire) {
            OPEN => GateState::Open,
            EXITED => GateState::Exited,
            _ => GateState::Killed,
        }
    }

    #[inline]
    fn close(&self, to: u8) -> bool {
        self.state
            .compare_exchange(OPEN, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_first_close_wins() {
        let gate = TerminationGate::new();
        assert_eq!(gate.state(), GateState::Open);
        assert!(gate.close_exited());
        assert!(!gate.close_killed());
        assert!(!gate.close_exited());
        assert_eq!(gate.state(), GateState::Exited);
    }

    #[test]
    fn test_kill_first_blocks_exit() {
        let gate = TerminationGate::new();
        assert!(gate.close_killed());
        assert!(!gate.close_exited());
        assert_eq!(gate.state(), GateState::Killed);
    }

    #[test]
    fn test_race_has_exactly_one_winner() {
        for _ in 0..200 {
            let gate = Arc::new(TerminationGate::new());
            let barrier = Arc::new(Barrier::new(2));

            let (g, b) = (Arc::clone(&gate), Arc::clone(&barrier));
            let exiter = thread::spawn(move || {
                b.wait();
                g.close_exited()
            });
            barrier.wait();
            let killed = gate.close_killed();
            let exited = exiter.join().expect("exiter thread");

            assert!(killed ^ exited, "exactly one side must close the gate");
            let expected = if killed {
                GateState::Killed
            } else {
                GateState::Exited
            };
            assert_eq!(gate.state(), expected);
        }
    }
}
