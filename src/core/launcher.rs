//! # Launcher: the trampoline every worker thread runs.
//!
//! ```text
//! spawn(name, cfg, control, bus)
//!   └─► std::thread::Builder (name = instance name, stack = cfg.stack_size_hint())
//!         └─► launch()
//!               ├─► block async signals (cfg.block_signals)
//!               ├─► CompletionGuard armed
//!               ├─► worker.run(&mut ctx)
//!               └─► guard dropped (return or unwind)
//!                     ├─► control.done()  → close gate as Exited, wake joiner
//!                     └─► publish ThreadExited
//! ```
//!
//! ## Rules
//! - The completion hook fires exactly once per context, including when `run` panics.
//! - The panic itself is not caught here; `join()` observes it through the `JoinHandle`.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::config::ThreadConfig;
use super::control::Control;
use super::os;
use crate::events::{Bus, Event, EventKind};
use crate::workers::ThreadContext;

/// Spawns the OS thread for an instance.
pub(crate) fn spawn(
    name: &Arc<str>,
    cfg: &ThreadConfig,
    control: &Arc<Control>,
    bus: Option<Bus>,
) -> io::Result<JoinHandle<()>> {
    // std rejects names with interior NULs; the OS only sees the part before one.
    let os_name = name.split('\0').next().unwrap_or_default();
    let mut builder = thread::Builder::new().name(os_name.to_string());
    if let Some(size) = cfg.stack_size_hint() {
        builder = builder.stack_size(size);
    }

    let ctx = ThreadContext::new(Arc::clone(name), Arc::clone(control));
    let name = Arc::clone(name);
    let control = Arc::clone(control);
    let block_signals = cfg.block_signals;

    builder.spawn(move || launch(ctx, &name, &control, block_signals, bus.as_ref()))
}

fn launch(
    mut ctx: ThreadContext,
    name: &str,
    control: &Control,
    block_signals: bool,
    bus: Option<&Bus>,
) {
    if block_signals {
        // Best-effort; on failure the inherited mask stays in place.
        let _ = os::block_async_signals();
    }

    let _guard = CompletionGuard { control, bus, name };
    let worker = Arc::clone(control.worker());
    worker.run(&mut ctx);
}

/// Fires the completion hook when dropped.
struct CompletionGuard<'a> {
    control: &'a Control,
    bus: Option<&'a Bus>,
    name: &'a str,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.control.done();
        if let Some(bus) = self.bus {
            let mut ev = Event::new(EventKind::ThreadExited).with_thread(self.name);
            if thread::panicking() {
                ev = ev.with_reason("panicked");
            }
            bus.publish(ev);
        }
    }
}
