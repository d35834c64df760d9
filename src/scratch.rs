//! # Per-thread scratch buffers for diagnostics.
//!
//! [`Scratch`] gives a worker reusable buffers for building formatted messages and OS
//! error descriptions without sharing a global buffer between threads.
//!
//! ## Rules
//! - Buffers are allocated lazily on first use and grow as needed; they are never shrunk.
//! - Every call overwrites the previous result. The returned `&str` borrows the scratch
//!   mutably, so it cannot outlive the next call.
//! - A `Scratch` is owned by exactly one [`ThreadContext`](crate::ThreadContext), which lives
//!   on exactly one OS thread. No locking is involved.
//!
//! ## Example
//! ```rust
//! use threadvisor::Scratch;
//!
//! let mut scratch = Scratch::new();
//! assert_eq!(scratch.fmt(format_args!("read {} bytes", 42)), "read 42 bytes");
//! assert_eq!(scratch.fmt(format_args!("eof")), "eof");
//! ```

use std::fmt::{self, Write as _};

/// Initial size of the error-string buffer.
#[cfg(unix)]
const ERR_BUF_INITIAL: usize = 128;

/// Largest error-string buffer `strerror` will grow to.
#[cfg(unix)]
const ERR_BUF_MAX: usize = 4096;

/// Reusable format and error-string buffers.
#[derive(Debug, Default)]
pub struct Scratch {
    fmt_buf: String,
    err_buf: Vec<u8>,
}

impl Scratch {
    /// Creates empty buffers. Nothing is allocated until first use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Formats `args` into the format buffer and returns the result.
    ///
    /// Use with [`format_args!`]: `scratch.fmt(format_args!("{peer}: {err}"))`.
    pub fn fmt(&mut self, args: fmt::Arguments<'_>) -> &str {
        self.fmt_buf.clear();
        // Writing into a `String` only fails if a `Display` impl reports an error;
        // whatever was written up to that point is kept.
        let _ = self.fmt_buf.write_fmt(args);
        &self.fmt_buf
    }

    /// Describes the OS error `code` (an `errno` value) using the error-string buffer.
    ///
    /// Unknown codes yield `"Unknown error <code>"` (or the platform's own wording).
    #[cfg(unix)]
    pub fn strerror(&mut self, code: i32) -> &str {
        if self.err_buf.is_empty() {
            self.err_buf.resize(ERR_BUF_INITIAL, 0);
        }

        loop {
            // SAFETY: the pointer and length describe `err_buf`, which outlives the call;
            // `strerror_r` (XSI variant) writes at most `len` bytes including the NUL.
            let rc = unsafe {
                libc::strerror_r(code, self.err_buf.as_mut_ptr().cast(), self.err_buf.len())
            };
            match rc {
                0 => break,
                libc::ERANGE if self.err_buf.len() < ERR_BUF_MAX => {
                    let grown = (self.err_buf.len() * 2).min(ERR_BUF_MAX);
                    self.err_buf.resize(grown, 0);
                }
                _ => {
                    self.unknown_error(code);
                    break;
                }
            }
        }

        self.err_str()
    }

    /// Describes the OS error `code` using the error-string buffer.
    #[cfg(not(unix))]
    pub fn strerror(&mut self, code: i32) -> &str {
        use std::io::Write as _;

        self.err_buf.clear();
        let _ = write!(self.err_buf, "{}", std::io::Error::from_raw_os_error(code));
        self.err_str()
    }

    #[cfg(unix)]
    fn unknown_error(&mut self, code: i32) {
        use std::io::Write as _;

        self.err_buf.clear();
        let _ = write!(self.err_buf, "Unknown error {code}");
    }

    /// The buffer's contents up to the first NUL (or its end).
    fn err_str(&self) -> &str {
        let end = self
            .err_buf
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.err_buf.len());
        std::str::from_utf8(&self.err_buf[..end]).unwrap_or("unknown error")
    }
}
