//! Error types used by threadvisor.
//!
//! Lifecycle misuse (double start, stop before start, join before start) is never an error;
//! those calls are defined as no-ops. A forced kill is not an error either, it is reported as
//! [`ThreadExit::Killed`](crate::ThreadExit::Killed) or
//! [`ThreadExit::Abandoned`](crate::ThreadExit::Abandoned).
//!
//! [`ThreadError`] only covers failures of the OS operation a call site attempted
//! (spawning a thread, renaming it) and provides `as_label`/`as_message` helpers for logs.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// # Errors produced by OS-level thread operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ThreadError {
    /// The OS refused to create the execution context.
    #[error("failed to spawn thread {name:?}: {source}")]
    Spawn {
        /// Name of the instance that failed to start.
        name: Arc<str>,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The requested OS thread name contains an interior NUL byte.
    #[error("os thread name {name:?} contains a NUL byte")]
    InvalidOsName {
        /// The rejected name.
        name: String,
    },

    /// The OS rejected the thread name.
    #[error("failed to set os thread name {name:?}: {source}")]
    OsName {
        /// The rejected name.
        name: String,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The operation is not available on this platform.
    #[error("operation not supported on this platform")]
    Unsupported,
}

impl ThreadError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use threadvisor::ThreadError;
    ///
    /// let err = ThreadError::InvalidOsName { name: "a\0b".into() };
    /// assert_eq!(err.as_label(), "thread_invalid_os_name");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ThreadError::Spawn { .. } => "thread_spawn_failed",
            ThreadError::InvalidOsName { .. } => "thread_invalid_os_name",
            ThreadError::OsName { .. } => "thread_os_name_failed",
            ThreadError::Unsupported => "thread_unsupported",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ThreadError::Spawn { name, source } => format!("spawn {name}: {source}"),
            ThreadError::InvalidOsName { name } => format!("invalid os name: {name:?}"),
            ThreadError::OsName { name, source } => format!("os name {name:?}: {source}"),
            ThreadError::Unsupported => "unsupported".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_error_keeps_source() {
        use std::error::Error as _;

        let err = ThreadError::Spawn {
            name: Arc::from("reader"),
            source: io::Error::from(io::ErrorKind::OutOfMemory),
        };
        assert_eq!(err.as_label(), "thread_spawn_failed");
        assert!(err.source().is_some());
        assert!(err.to_string().contains("\"reader\""));
        assert!(err.as_message().starts_with("spawn reader:"));
    }

    #[test]
    fn test_labels_are_distinct() {
        let labels = [
            ThreadError::InvalidOsName { name: String::new() }.as_label(),
            ThreadError::OsName {
                name: String::new(),
                source: io::Error::from_raw_os_error(34),
            }
            .as_label(),
            ThreadError::Unsupported.as_label(),
        ];
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[1], labels[2]);
        assert_ne!(labels[0], labels[2]);
    }
}
