//! Thread core: lifecycle, termination gate and the OS glue.
//!
//! The only types this module exposes are the owner handle [`BasicThread`] (with its
//! [`ThreadBuilder`]), the signal-safe [`KillSwitch`], [`ThreadConfig`] and the state enums.
//!
//! Internal modules:
//! - [`thread`]: owner handle, start/stop/kill/join;
//! - [`control`]: flags and hooks shared between owner, worker and kill switches;
//! - [`gate`]: one-shot termination gate deciding between natural exit and kill;
//! - [`launcher`]: trampoline that runs the worker and fires the completion hook;
//! - [`os`]: OS thread naming and signal masks;
//! - [`state`]: observable lifecycle and exit states.

mod config;
mod control;
mod gate;
mod launcher;
pub(crate) mod os;
mod state;
mod thread;

pub use config::ThreadConfig;
pub(crate) use control::Control;
pub use control::KillSwitch;
pub use state::{ThreadExit, ThreadState};
pub use thread::{BasicThread, ThreadBuilder};
pub(crate) use thread::panic_message;
