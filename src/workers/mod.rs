//! # Worker abstractions.
//!
//! This module provides the worker-facing types:
//! - [`Worker`] - entry routine plus optional lifecycle hooks
//! - [`WorkerFn`] - closure-backed implementation
//! - [`WorkerRef`] - shared reference to a worker (`Arc<dyn Worker>`)
//! - [`ThreadContext`] - what the entry routine sees of its instance

mod context;
mod worker;
mod worker_fn;

pub use context::ThreadContext;
pub use worker::Worker;
pub use worker_fn::{WorkerFn, WorkerRef};
