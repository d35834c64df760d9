//! # Platform glue for worker threads.
//!
//! - [`set_current_thread_name`]: rename the calling OS thread (cosmetic, best-effort).
//! - [`block_async_signals`]: keep process signals away from worker threads.
//!
//! **Linux:** `pthread_setname_np(pthread_self(), ..)`, names truncated to 15 bytes.
//! **Apple:** `pthread_setname_np(..)` on the calling thread, names truncated to 63 bytes.
//! **Other platforms:** renaming reports [`ThreadError::Unsupported`]; signal masking is a no-op.

use crate::error::ThreadError;

#[cfg(any(target_os = "linux", target_vendor = "apple"))]
pub(crate) fn set_current_thread_name(name: &str) -> Result<(), ThreadError> {
    use std::ffi::CString;
    use std::io;

    #[cfg(target_os = "linux")]
    const MAX_LEN: usize = 15;
    #[cfg(target_vendor = "apple")]
    const MAX_LEN: usize = 63;

    let cname = CString::new(truncate(name, MAX_LEN)).map_err(|_| ThreadError::InvalidOsName {
        name: name.to_string(),
    })?;

    #[cfg(target_os = "linux")]
    // SAFETY: `cname` is a valid NUL-terminated string within the kernel's length limit.
    let rc = unsafe { libc::pthread_setname_np(libc::pthread_self(), cname.as_ptr()) };
    #[cfg(target_vendor = "apple")]
    // SAFETY: `cname` is a valid NUL-terminated string within the platform's length limit.
    let rc = unsafe { libc::pthread_setname_np(cname.as_ptr()) };

    if rc == 0 {
        Ok(())
    } else {
        Err(ThreadError::OsName {
            name: name.to_string(),
            source: io::Error::from_raw_os_error(rc),
        })
    }
}

#[cfg(not(any(target_os = "linux", target_vendor = "apple")))]
pub(crate) fn set_current_thread_name(_name: &str) -> Result<(), ThreadError> {
    Err(ThreadError::Unsupported)
}

/// Blocks every signal except the synchronous fault signals in the calling thread.
///
/// POSIX leaves the result undefined when SIGFPE, SIGSEGV, SIGBUS or SIGILL are
/// generated while blocked, so those stay deliverable.
#[cfg(unix)]
pub(crate) fn block_async_signals() -> nix::Result<()> {
    use nix::sys::signal::{SigSet, Signal};

    let mut set = SigSet::all();
    for sig in [Signal::SIGFPE, Signal::SIGSEGV, Signal::SIGBUS, Signal::SIGILL] {
        set.remove(sig);
    }
    set.thread_block()
}

#[cfg(not(unix))]
pub(crate) fn block_async_signals() -> Result<(), std::convert::Infallible> {
    Ok(())
}

/// Longest prefix of `name` that fits in `max` bytes without splitting a character.
#[cfg_attr(not(any(target_os = "linux", target_vendor = "apple")), allow(dead_code))]
fn truncate(name: &str, max: usize) -> &str {
    if name.len() <= max {
        return name;
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 15), "short");
        assert_eq!(truncate("exactly-fifteen", 15), "exactly-fifteen");
        assert_eq!(truncate("a-much-longer-thread-name", 15), "a-much-longer-t");
        // 'é' is two bytes; a cut in its middle backs off to the previous boundary.
        assert_eq!(truncate("abcdefghijklmné", 15), "abcdefghijklmn");
    }

    #[cfg(any(target_os = "linux", target_vendor = "apple"))]
    #[test]
    fn test_interior_nul_is_rejected() {
        let err = std::thread::spawn(|| set_current_thread_name("bad\0name"))
            .join()
            .expect("naming thread")
            .expect_err("NUL must be rejected");
        assert_eq!(err.as_label(), "thread_invalid_os_name");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_rename_is_visible_in_procfs() {
        let comm = std::thread::spawn(|| {
            set_current_thread_name("renamed-by-test-long").expect("rename");
            std::fs::read_to_string("/proc/thread-self/comm").expect("read comm")
        })
        .join()
        .expect("naming thread");
        assert_eq!(comm.trim_end(), "renamed-by-test");
    }

    #[cfg(unix)]
    #[test]
    fn test_block_keeps_fault_signals() {
        use nix::sys::signal::{SigSet, Signal};

        let mask = std::thread::spawn(|| {
            block_async_signals().expect("block");
            SigSet::thread_get_mask().expect("mask")
        })
        .join()
        .expect("masking thread");

        assert!(mask.contains(Signal::SIGTERM));
        assert!(mask.contains(Signal::SIGINT));
        assert!(!mask.contains(Signal::SIGSEGV));
        assert!(!mask.contains(Signal::SIGFPE));
    }
}
