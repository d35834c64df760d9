//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out that drives
//! subscribers from events published on a [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   BasicThread ── publish(Event) ──► Bus ──► SubscriberSet::listen() thread
//!                                                   │
//!                                                   └──► SubscriberSet::emit(&Event)
//!                                                             │
//!                                                   ┌─────────┼─────────┐
//!                                                   ▼         ▼         ▼
//!                                               LogWriter   Metrics   Custom ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use threadvisor::{Event, EventKind, Subscribe};
//!
//! struct Alerts;
//!
//! impl Subscribe for Alerts {
//!     fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::JoinAbandoned {
//!             // page someone
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
