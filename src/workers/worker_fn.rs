//! # Function-backed worker (`WorkerFn`)
//!
//! [`WorkerFn`] wraps a closure `F: Fn(&mut ThreadContext)` and uses it as the entry routine.
//! All lifecycle hooks keep their no-op defaults; implement [`Worker`] directly when hooks
//! are needed.
//!
//! ## Example
//! ```rust
//! use threadvisor::{ThreadContext, WorkerFn, WorkerRef};
//!
//! let w: WorkerRef = WorkerFn::arc(|ctx: &mut ThreadContext| {
//!     while !ctx.terminating() {
//!         std::thread::yield_now();
//!     }
//! });
//! # let _ = w;
//! ```

use std::sync::Arc;

use crate::workers::{ThreadContext, Worker};

/// Shared handle to a worker.
pub type WorkerRef = Arc<dyn Worker>;

/// Function-backed worker implementation.
#[derive(Debug)]
pub struct WorkerFn<F> {
    f: F,
}

impl<F> WorkerFn<F> {
    /// Creates a new function-backed worker.
    ///
    /// Prefer [`WorkerFn::arc`] when you immediately need a [`WorkerRef`].
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the worker and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> Worker for WorkerFn<F>
where
    F: Fn(&mut ThreadContext) + Send + Sync + 'static,
{
    fn run(&self, ctx: &mut ThreadContext) {
        (self.f)(ctx)
    }
}
