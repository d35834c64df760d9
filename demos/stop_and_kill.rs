//! # Example: stop_and_kill
//!
//! Demonstrates both ways of ending a worker thread.
//!
//! Shows how to:
//! - Stop a cooperative worker with [`BasicThread::prepare_stop`] and [`BasicThread::stop`]
//! - Kill a worker that never polls its termination flag, via a [`KillSwitch`]
//! - Observe lifecycle events through a [`SubscriberSet`] listening on a [`Bus`]
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► SubscriberSet::listen(bus)
//!   │
//!   ├─► "poller" (implements Worker with hooks)
//!   │     ├─► start()         → on_start, ThreadStarted
//!   │     ├─► prepare_stop()  → on_prepare_stop, StopPrepared
//!   │     ├─► stop()          → on_stop, StopRequested; worker returns → ThreadExited
//!   │     └─► join()          → ThreadJoined (exit=returned)
//!   │
//!   └─► "spinner" (blocked for an hour, kill_grace = 200ms)
//!         ├─► start()
//!         ├─► helper thread: KillSwitch::kill() → on_kill
//!         └─► join()          → ThreadKilled, JoinAbandoned, ThreadJoined (exit=abandoned)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example stop_and_kill --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use threadvisor::{
    BasicThread, Bus, Subscribe, SubscriberSet, ThreadConfig, ThreadContext, Worker, WorkerFn,
};

/// Counts ticks until asked to terminate.
#[derive(Default)]
struct Poller {
    ticks: AtomicU64,
}

impl Worker for Poller {
    fn run(&self, ctx: &mut ThreadContext) {
        ctx.set_os_name("demo-poller");
        while !ctx.terminating() {
            let n = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
            if n % 10 == 0 {
                println!("{}", ctx.fmt(format_args!("[poller] tick {n}")));
            }
            thread::sleep(Duration::from_millis(10));
        }
        println!("[poller] terminating after {} ticks", self.ticks.load(Ordering::Relaxed));
    }

    fn on_start(&self) {
        println!("[poller] on_start");
    }

    fn on_prepare_stop(&self) {
        println!("[poller] on_prepare_stop");
    }

    fn on_stop(&self) {
        println!("[poller] on_stop");
    }
}

fn main() -> anyhow::Result<()> {
    println!("=== stop_and_kill example ===\n");

    // 1. Optional: add subscriber to see events (requires "logging" feature)
    #[cfg(feature = "logging")]
    let subs: Vec<Arc<dyn Subscribe>> = {
        use threadvisor::LogWriter;
        vec![Arc::new(LogWriter)]
    };
    #[cfg(not(feature = "logging"))]
    let subs: Vec<Arc<dyn Subscribe>> = Vec::new();

    let bus = Bus::new(256);
    let set = Arc::new(SubscriberSet::with_bus(subs, &bus)?);
    let mut listener = set.listen(&bus)?;

    // 2. Cooperative stop
    let poller = Arc::new(Poller::default());
    let mut t = BasicThread::builder(poller.clone())
        .name("poller")
        .bus(bus.clone())
        .build();
    t.start()?;
    thread::sleep(Duration::from_millis(250));
    t.prepare_stop();
    t.stop();
    t.join();
    println!("[main] poller finished: {:?}\n", t.exit());

    // 3. Forced termination of a worker that never looks at its flags
    let cfg = ThreadConfig {
        kill_grace: Duration::from_millis(200),
        ..ThreadConfig::default()
    };
    let mut spinner = BasicThread::builder(WorkerFn::arc(|ctx: &mut ThreadContext| {
        ctx.set_os_name("demo-spinner");
        // Stuck in a blocking call that never checks `terminating`.
        thread::sleep(Duration::from_secs(3600));
    }))
    .name("spinner")
    .config(cfg)
    .bus(bus.clone())
    .build();
    spinner.start()?;

    let switch = spinner.kill_switch();
    let killer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(150));
        println!("[killer] pulling the kill switch");
        switch.kill();
    });

    spinner.join();
    let _ = killer.join();
    println!("[main] spinner finished: {:?}", spinner.exit());

    // 4. Drain events and shut the subscribers down
    listener.stop();
    listener.join();
    drop(listener);
    if let Ok(set) = Arc::try_unwrap(set) {
        set.shutdown();
    }

    println!("\n=== done ===");
    Ok(())
}
