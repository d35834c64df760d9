//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [started] thread=reader
//! [stop-prepared] thread=reader
//! [stop-requested] thread=reader
//! [exited] thread=reader
//! [joined] thread=reader exit=returned
//! [killed] thread=spinner grace=250ms
//! [abandoned] thread=spinner grace=250ms
//! [panicked] thread=parser reason="index out of bounds"
//! ```
//!
//! ## Example
//! ```no_run
//! # use std::sync::Arc;
//! # use threadvisor::{LogWriter, SubscriberSet};
//! let set = SubscriberSet::new(vec![Arc::new(LogWriter::default()) as _])?;
//! // LogWriter will print every emitted event to stdout
//! # Ok::<(), threadvisor::ThreadError>(())
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use; implement a custom
/// [`Subscribe`] for structured logging or metrics collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    fn render(e: &Event) -> String {
        let thread = e.thread.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::ThreadStarted => format!("[started] thread={thread}"),
            EventKind::SpawnFailed => {
                format!("[spawn-failed] thread={thread} err={:?}", e.reason)
            }
            EventKind::StopPrepared => format!("[stop-prepared] thread={thread}"),
            EventKind::StopRequested => format!("[stop-requested] thread={thread}"),
            EventKind::ThreadExited => match e.reason.as_deref() {
                Some(reason) => format!("[exited] thread={thread} reason={reason}"),
                None => format!("[exited] thread={thread}"),
            },
            EventKind::ThreadKilled => {
                format!("[killed] thread={thread} grace={}ms", e.grace_ms.unwrap_or(0))
            }
            EventKind::JoinAbandoned => {
                format!("[abandoned] thread={thread} grace={}ms", e.grace_ms.unwrap_or(0))
            }
            EventKind::ThreadPanicked => {
                format!(
                    "[panicked] thread={thread} reason={:?}",
                    e.reason.as_deref().unwrap_or("")
                )
            }
            EventKind::ThreadJoined => match e.reason.as_deref() {
                Some(exit) => format!("[joined] thread={thread} exit={exit}"),
                None => format!("[joined] thread={thread}"),
            },
            EventKind::SubscriberPanicked => {
                format!("[subscriber-panicked] subscriber={thread} reason={:?}", e.reason)
            }
            EventKind::SubscriberOverflow => {
                format!("[subscriber-overflow] subscriber={thread} reason={:?}", e.reason)
            }
        }
    }
}

impl Subscribe for LogWriter {
    fn on_event(&self, e: &Event) {
        println!("{}", Self::render(e));
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_render_lifecycle_lines() {
        let ev = Event::new(EventKind::ThreadStarted).with_thread("reader");
        assert_eq!(LogWriter::render(&ev), "[started] thread=reader");

        let ev = Event::new(EventKind::ThreadKilled)
            .with_thread("spinner")
            .with_grace(Duration::from_millis(250));
        assert_eq!(LogWriter::render(&ev), "[killed] thread=spinner grace=250ms");

        let ev = Event::new(EventKind::ThreadPanicked)
            .with_thread("parser")
            .with_reason("index out of bounds");
        assert_eq!(
            LogWriter::render(&ev),
            "[panicked] thread=parser reason=\"index out of bounds\""
        );
    }

    #[test]
    fn test_render_without_thread() {
        let ev = Event::new(EventKind::ThreadJoined);
        assert_eq!(LogWriter::render(&ev), "[joined] thread=?");
    }
}
