//! # Per-instance thread configuration.
//!
//! Provides [`ThreadConfig`], the settings a [`BasicThread`](crate::BasicThread) is built with.
//!
//! ## Sentinel values
//! - `stack_size = 0` → platform default stack size
//! - `kill_grace = 0s` → a killed context is abandoned by `join()` without waiting

use std::time::Duration;

/// Configuration for one thread instance.
///
/// ## Field semantics
/// - `stack_size`: Stack size of the spawned OS thread in bytes (`0` = platform default)
/// - `kill_grace`: How long `join()` waits for a killed context to finish (`0s` = no wait)
/// - `block_signals`: Block asynchronous signals inside the worker thread
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct ThreadConfig {
    /// Stack size of the spawned OS thread in bytes.
    ///
    /// - `0` = platform default
    /// - `n > 0` = passed to the OS, which may round it up
    pub stack_size: usize,

    /// Maximum time `join()` waits for a killed context to exit on its own.
    ///
    /// When `kill()` wins the termination gate:
    /// - `join()` waits up to `kill_grace` for the OS thread to finish
    /// - a context that finished in time is joined normally
    /// - otherwise it is detached and `join()` reports
    ///   [`ThreadExit::Abandoned`](crate::ThreadExit::Abandoned)
    pub kill_grace: Duration,

    /// Whether the worker blocks asynchronous signals on entry.
    ///
    /// Process signals are then delivered to the owner's threads only. Synchronous
    /// fault signals (SIGFPE, SIGSEGV, SIGBUS, SIGILL) always stay unblocked.
    pub block_signals: bool,
}

impl ThreadConfig {
    /// Returns the requested stack size as an `Option`.
    ///
    /// - `None` → platform default
    /// - `Some(n)` → explicit size in bytes
    #[inline]
    pub fn stack_size_hint(&self) -> Option<usize> {
        if self.stack_size == 0 {
            None
        } else {
            Some(self.stack_size)
        }
    }

    /// Returns the kill grace as an `Option`.
    ///
    /// - `None` → abandon a killed context immediately
    /// - `Some(d)` → wait up to `d` for it to finish
    #[inline]
    pub fn kill_grace_limit(&self) -> Option<Duration> {
        if self.kill_grace == Duration::ZERO {
            None
        } else {
            Some(self.kill_grace)
        }
    }
}

impl Default for ThreadConfig {
    /// Default configuration:
    ///
    /// - `stack_size = 0` (platform default)
    /// - `kill_grace = 0s` (kill is an emergency path, never wait)
    /// - `block_signals = true` (signals are handled by the owner)
    fn default() -> Self {
        Self {
            stack_size: 0,
            kill_grace: Duration::ZERO,
            block_signals: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_sentinels() {
        let cfg = ThreadConfig::default();
        assert_eq!(cfg.stack_size_hint(), None);
        assert_eq!(cfg.kill_grace_limit(), None);
        assert!(cfg.block_signals);
    }

    #[test]
    fn test_explicit_values_pass_through() {
        let cfg = ThreadConfig {
            stack_size: 256 * 1024,
            kill_grace: Duration::from_millis(50),
            block_signals: false,
        };
        assert_eq!(cfg.stack_size_hint(), Some(256 * 1024));
        assert_eq!(cfg.kill_grace_limit(), Some(Duration::from_millis(50)));
    }
}
