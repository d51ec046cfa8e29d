// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repeating interval timer driving a callback on a dedicated thread.

use parking_lot::{Condvar, Mutex};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::warn;

/// Callback invoked on the timer thread at every tick.
pub type TimerCallback = Arc<dyn Fn() + Send + Sync>;

struct Shared {
    interval: Duration,
    running: bool,
    quit: bool,
    callback: Option<TimerCallback>,
}

struct Core {
    shared: Mutex<Shared>,
    cond: Condvar,
}

/// A repeating timer. Created stopped; `start` begins ticking every
/// interval, `stop` pauses without killing the thread, and dropping the
/// timer shuts the thread down. Ticks are best-effort: changing the
/// interval or stopping mid-wait restarts the current period.
pub struct Timer {
    core: Arc<Core>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Timer {
    pub fn new(interval: Duration) -> Self {
        let core = Arc::new(Core {
            shared: Mutex::new(Shared {
                interval,
                running: false,
                quit: false,
                callback: None,
            }),
            cond: Condvar::new(),
        });

        let thread_core = Arc::clone(&core);
        let spawned = thread::Builder::new()
            .name(String::from("mr-timer"))
            .spawn(move || run(thread_core));
        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(%err, "failed to spawn timer thread");
                None
            }
        };

        Self { core, handle: Mutex::new(handle) }
    }

    /// Install (or replace) the tick callback.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.core.shared.lock().callback = Some(Arc::new(callback));
    }

    /// Change the tick interval. Takes effect from the next period.
    pub fn set_interval(&self, interval: Duration) {
        self.core.shared.lock().interval = interval;
        self.core.cond.notify_all();
    }

    pub fn interval(&self) -> Duration {
        self.core.shared.lock().interval
    }

    pub fn is_running(&self) -> bool {
        self.core.shared.lock().running
    }

    /// Begin ticking; the first tick fires one interval from now.
    pub fn start(&self) {
        self.core.shared.lock().running = true;
        self.core.cond.notify_all();
    }

    /// Pause ticking. The thread stays parked until `start` or drop.
    pub fn stop(&self) {
        self.core.shared.lock().running = false;
        self.core.cond.notify_all();
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        {
            let mut shared = self.core.shared.lock();
            shared.quit = true;
        }
        self.core.cond.notify_all();
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("timer thread panicked");
            }
        }
    }
}

fn run(core: Arc<Core>) {
    loop {
        let callback;
        {
            let mut shared = core.shared.lock();
            if shared.quit {
                break;
            }
            if !shared.running {
                core.cond.wait(&mut shared);
                continue;
            }
            let interval = shared.interval;
            let timed_out = core.cond.wait_for(&mut shared, interval).timed_out();
            if shared.quit {
                break;
            }
            if !timed_out || !shared.running {
                // Woken for a state change; re-evaluate from the top.
                continue;
            }
            callback = shared.callback.clone();
        }
        if let Some(callback) = callback {
            if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                warn!("timer callback panicked");
            }
        }
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
