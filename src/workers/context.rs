//! # Worker-side view of a thread instance.
//!
//! [`ThreadContext`] is created by `start()` and moved into the spawned OS thread, where it
//! is handed to [`Worker::run`](crate::Worker::run). It is the worker's only access to the
//! instance: it reads (never writes) the termination flags, renames the OS thread, and owns
//! the [`Scratch`] buffers.
//!
//! ## Rules
//! - The context never leaves its OS thread, so the scratch buffers are single-context by
//!   construction.
//! - `fmt`/`strerror` borrow the context mutably; a returned `&str` is valid until the
//!   next call.

use std::fmt;
use std::sync::Arc;

use crate::core::Control;
use crate::error::ThreadError;
use crate::scratch::Scratch;

/// Worker-side handle passed to [`Worker::run`](crate::Worker::run).
pub struct ThreadContext {
    name: Arc<str>,
    control: Arc<Control>,
    scratch: Scratch,
}

impl ThreadContext {
    pub(crate) fn new(name: Arc<str>, control: Arc<Control>) -> Self {
        Self {
            name,
            control,
            scratch: Scratch::new(),
        }
    }

    /// Name of the instance this context belongs to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true once the owner called `stop()` or `kill()`.
    ///
    /// Poll this at bounded intervals and return from `run` once it is set.
    #[inline]
    pub fn terminating(&self) -> bool {
        self.control.terminating()
    }

    /// Returns true once `kill()` was called.
    #[inline]
    pub fn killed(&self) -> bool {
        self.control.killed()
    }

    /// Sets the name the OS shows for this thread. Best-effort; returns `false` on failure.
    pub fn set_os_name(&self, name: &str) -> bool {
        self.try_set_os_name(name).is_ok()
    }

    /// Like [`set_os_name`](Self::set_os_name), reporting why the OS rejected the name.
    pub fn try_set_os_name(&self, name: &str) -> Result<(), ThreadError> {
        crate::core::os::set_current_thread_name(name)
    }

    /// Formats into this thread's scratch buffer. See [`Scratch::fmt`].
    pub fn fmt(&mut self, args: fmt::Arguments<'_>) -> &str {
        self.scratch.fmt(args)
    }

    /// Describes an OS error code using this thread's scratch buffer. See [`Scratch::strerror`].
    pub fn strerror(&mut self, code: i32) -> &str {
        self.scratch.strerror(code)
    }
}

impl fmt::Debug for ThreadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadContext")
            .field("name", &self.name)
            .field("terminating", &self.terminating())
            .field("killed", &self.killed())
            .finish()
    }
}
