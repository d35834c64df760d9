//! # Worker capability.
//!
//! A [`Worker`] is the user-supplied entry routine of a thread instance plus optional
//! lifecycle hooks. The routine runs once on the dedicated OS thread; the hooks run on
//! whichever thread drives the corresponding lifecycle call.
//!
//! ```text
//!  owner thread                                   worker thread
//!  ────────────                                   ─────────────
//!  start() ─► spawn ─────────────────────────────► run(ctx) … polls ctx.terminating()
//!          └► on_start()
//!  prepare_stop() ─► on_prepare_stop()
//!  stop() ─► terminating = true ─► on_stop()                │
//!                                                           ▼
//!  join() ◄──────────────────────────────────────── run returns ─► completion hook
//!
//!  kill() (owner or signal handler) ─► terminating = killed = true ─► on_kill()
//! ```

use crate::workers::ThreadContext;

/// # Entry routine and lifecycle hooks of a thread instance.
///
/// Implementations must poll [`ThreadContext::terminating`] at bounded intervals and return
/// promptly once it reports `true`. The completion hook fires automatically when `run`
/// returns or unwinds.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use threadvisor::{ThreadContext, Worker};
///
/// struct Ticker;
///
/// impl Worker for Ticker {
///     fn run(&self, ctx: &mut ThreadContext) {
///         while !ctx.terminating() {
///             std::thread::sleep(Duration::from_millis(10));
///         }
///     }
/// }
/// ```
pub trait Worker: Send + Sync + 'static {
    /// Entry routine, executed once on the dedicated OS thread.
    fn run(&self, ctx: &mut ThreadContext);

    /// Called on the owner's thread right after the OS thread was spawned.
    fn on_start(&self) {}

    /// Called on the owner's thread by `prepare_stop()`, before the worker is told to stop.
    ///
    /// Use it to quiesce upstream producers.
    fn on_prepare_stop(&self) {}

    /// Called on the owner's thread by `stop()`, after `terminating` was raised.
    fn on_stop(&self) {}

    /// Called by `kill()`, after `terminating` and `killed` were raised.
    ///
    /// `kill()` may run inside a signal handler, so implementations must be
    /// async-signal-safe: no allocation, no locks, no blocking.
    fn on_kill(&self) {}
}
