//! Lifecycle events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `BasicThread` (owner-side transitions), the launcher trampoline
//!   (`ThreadExited`), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `SubscriberSet::listen` and any receiver obtained from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
