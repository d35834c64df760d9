//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into the crate.
//! Each subscriber is driven by a dedicated worker thread fed by a bounded queue that is
//! owned by the [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching, retries); they do **not** block the
//!   publisher nor other subscribers.
//! - Each subscriber **declares** its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. If a queue overflows, events for that subscriber are
//!   **dropped** (warn).
//!
//! ## Example
//! ```rust
//! use threadvisor::{Event, Subscribe};
//!
//! struct Audit;
//!
//! impl Subscribe for Audit {
//!     fn on_event(&self, ev: &Event) {
//!         let _ = ev; // write audit record...
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//!     fn queue_capacity(&self) -> usize { 512 }
//! }
//! ```

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from the subscriber's dedicated worker thread, never from the publisher.
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    fn on_event(&self, event: &Event);

    /// Human-readable name (for logs and worker thread names).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    ///
    /// On overflow, events for this subscriber are **dropped** (warn).
    fn queue_capacity(&self) -> usize {
        1024
    }
}
