// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide worker registry.
//!
//! The manager's map is the root owner of every long-lived worker: an
//! entry stays in the map until its thread has been joined. User-facing
//! references are the integer ids resolved through [`get`](WorkerManager::get).

use crate::task::TaskPtr;
use crate::worker::{Worker, WorkerPtr};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

static INSTANCE: OnceLock<WorkerManager> = OnceLock::new();

/// Registry owning the process's workers.
pub struct WorkerManager {
    pool: RwLock<HashMap<i32, WorkerPtr>>,
    shutdown: AtomicBool,
}

impl WorkerManager {
    /// The process-wide instance.
    pub fn instance() -> &'static WorkerManager {
        INSTANCE.get_or_init(|| WorkerManager {
            pool: RwLock::new(HashMap::new()),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Construct a worker, optionally pre-seeded with tasks. Unless
    /// `detach`, the manager retains it and [`quit_all`](Self::quit_all)
    /// will shut it down.
    pub fn create(&self, initial_tasks: Vec<TaskPtr>, detach: bool) -> WorkerPtr {
        let worker = Arc::new(Worker::new(initial_tasks));
        if self.shutdown.load(Ordering::Acquire) {
            warn!(worker = worker.id(), "worker manager already shut down, worker is unmanaged");
            return worker;
        }
        if !detach {
            self.pool.write().insert(worker.id(), worker.clone());
        }
        worker
    }

    /// Look up a retained worker by id.
    pub fn get(&self, id: i32) -> Option<WorkerPtr> {
        self.pool.read().get(&id).cloned()
    }

    /// Number of retained workers.
    pub fn count(&self) -> usize {
        self.pool.read().len()
    }

    /// Spin-poll (1 ms granularity) until `worker`'s queue drains or
    /// `timeout` elapses. Returns whether it drained.
    pub fn wait(&self, worker: &WorkerPtr, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while worker.task_count() > 0 {
            if Instant::now() >= deadline {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        worker.task_count() == 0
    }

    /// Finalize and join every retained worker, then forbid further
    /// managed creation. Entries leave the map only after their thread
    /// has exited.
    pub fn quit_all(&self) {
        self.shutdown.store(true, Ordering::Release);
        let workers: Vec<WorkerPtr> = self.pool.read().values().cloned().collect();
        for worker in &workers {
            worker.quit();
            worker.join();
        }
        self.pool.write().clear();
        debug!(count = workers.len(), "worker manager shut down");
    }

    /// Drop every retained worker and re-arm the manager. Test scaffolding
    /// only: the singletons outlive each test.
    #[cfg(any(test, feature = "test-support"))]
    pub fn reset(&self) {
        let workers: Vec<WorkerPtr> = self.pool.read().values().cloned().collect();
        for worker in &workers {
            worker.quit();
            worker.join();
        }
        self.pool.write().clear();
        self.shutdown.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "worker_manager_tests.rs"]
mod tests;
