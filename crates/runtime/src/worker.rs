// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-thread task execution engine.
//!
//! A worker owns one OS thread that loops over a FIFO of task entries.
//! The thread is spawned at construction and parks in `Idle` until
//! `start`; `stop` pauses consumption without exiting; `quit` finalizes
//! the loop, after which the thread marks itself `Exited`.

use crate::task::{Task, TaskCallback, TaskHandle, TaskPtr, WeakTaskPtr};
use mr_core::id::{next_id, IdKind};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Shared handle to a worker.
pub type WorkerPtr = Arc<Worker>;

/// How long the thread parks on an empty queue before re-checking state.
const QUEUE_WAIT: Duration = Duration::from_secs(1);

/// Backoff between iterations while the worker is not `Running`.
const PAUSED_BACKOFF: Duration = Duration::from_millis(1);

/// Lifecycle of a worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Thread is up but consumption has not started.
    Idle,
    /// Consuming the queue.
    Running,
    /// Consumption paused; `start` resumes it.
    Stopped,
    /// Exit requested; the thread leaves its loop after the current task.
    Finalized,
    /// Thread has left its loop. Terminal.
    Exited,
}

mr_core::simple_display! {
    WorkerState {
        Idle      => "idle",
        Running   => "running",
        Stopped   => "stopped",
        Finalized => "finalized",
        Exited    => "exited",
    }
}

/// A queue entry either keeps its task alive, or lets the producer cancel
/// the task by dropping the last strong handle before the worker claims it.
pub enum QueueEntry {
    Strong(TaskPtr),
    Weak(WeakTaskPtr),
}

impl QueueEntry {
    fn claim(self) -> Option<TaskPtr> {
        match self {
            QueueEntry::Strong(task) => Some(task),
            QueueEntry::Weak(task) => task.upgrade(),
        }
    }
}

struct Shared {
    state: WorkerState,
    queue: VecDeque<QueueEntry>,
    joined: bool,
}

struct Core {
    id: i32,
    shared: Mutex<Shared>,
    cond: Condvar,
    executed: AtomicUsize,
    thread_id: OnceLock<ThreadId>,
    #[cfg(target_os = "linux")]
    tid: OnceLock<nix::unistd::Pid>,
}

/// A thread plus a task queue plus a lifecycle state machine.
pub struct Worker {
    core: Arc<Core>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    /// Spawn the worker thread, optionally pre-seeded with tasks. The
    /// worker starts `Idle`; seeded tasks run once `start` is called.
    pub fn new(initial_tasks: Vec<TaskPtr>) -> Self {
        let core = Arc::new(Core {
            id: next_id(IdKind::Worker),
            shared: Mutex::new(Shared {
                state: WorkerState::Idle,
                queue: initial_tasks.into_iter().map(QueueEntry::Strong).collect(),
                joined: false,
            }),
            cond: Condvar::new(),
            executed: AtomicUsize::new(0),
            thread_id: OnceLock::new(),
            #[cfg(target_os = "linux")]
            tid: OnceLock::new(),
        });

        let thread_core = Arc::clone(&core);
        let spawned = thread::Builder::new()
            .name(format!("mr-worker-{}", core.id))
            .spawn(move || run(thread_core));
        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(worker = core.id, %err, "failed to spawn worker thread");
                core.shared.lock().state = WorkerState::Exited;
                None
            }
        };

        Self { core, handle: Mutex::new(handle) }
    }

    pub fn id(&self) -> i32 {
        self.core.id
    }

    pub fn state(&self) -> WorkerState {
        self.core.shared.lock().state
    }

    /// Begin (or resume) consuming the queue. Allowed from `Idle` and
    /// `Stopped`; anywhere else it is a logged no-op.
    pub fn start(&self) {
        let mut shared = self.core.shared.lock();
        match shared.state {
            WorkerState::Idle | WorkerState::Stopped => {
                shared.state = WorkerState::Running;
                drop(shared);
                self.core.cond.notify_all();
            }
            WorkerState::Running => {}
            state => {
                drop(shared);
                warn!(worker = self.core.id, %state, "start ignored");
            }
        }
    }

    /// Pause consumption without exiting the thread. Allowed from
    /// `Running`; anywhere else it is a logged no-op.
    pub fn stop(&self) {
        let mut shared = self.core.shared.lock();
        match shared.state {
            WorkerState::Running => shared.state = WorkerState::Stopped,
            WorkerState::Stopped => {}
            state => {
                drop(shared);
                warn!(worker = self.core.id, %state, "stop ignored");
            }
        }
    }

    /// Ask the thread to exit. The in-flight task, if any, runs to
    /// completion first; queued tasks are abandoned with the thread.
    pub fn quit(&self) {
        {
            let mut shared = self.core.shared.lock();
            match shared.state {
                WorkerState::Idle | WorkerState::Running | WorkerState::Stopped => {
                    shared.state = WorkerState::Finalized;
                }
                WorkerState::Finalized | WorkerState::Exited => {}
            }
        }
        self.core.cond.notify_all();
    }

    /// Push a task that stays alive until executed.
    pub fn add_task(&self, task: TaskPtr) {
        self.push(QueueEntry::Strong(task));
    }

    /// Push a task the producer may cancel by dropping its strong handle
    /// before the worker claims the entry.
    pub fn add_weak_task(&self, task: WeakTaskPtr) {
        self.push(QueueEntry::Weak(task));
    }

    fn push(&self, entry: QueueEntry) {
        {
            let mut shared = self.core.shared.lock();
            if shared.state == WorkerState::Exited {
                drop(shared);
                warn!(worker = self.core.id, "task rejected, worker exited");
                return;
            }
            shared.queue.push_back(entry);
        }
        self.core.cond.notify_one();
    }

    /// Bind `func` into a task, enqueue it, and return the typed handle.
    pub fn submit<R, F>(&self, func: F, callback: Option<TaskCallback<R>>) -> Arc<Task<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let task = Task::new(func, callback);
        self.add_task(task.clone());
        task
    }

    /// Drop every queued entry. The in-flight task, if any, keeps running.
    pub fn reset(&self) {
        let mut shared = self.core.shared.lock();
        if shared.state != WorkerState::Exited {
            shared.queue.clear();
        }
    }

    /// Block until the worker thread exits. Only the first of
    /// `join`/`detach` takes effect; later calls are no-ops.
    pub fn join(&self) {
        {
            let mut shared = self.core.shared.lock();
            if shared.joined {
                return;
            }
            shared.joined = true;
        }
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(worker = self.core.id, "worker thread panicked");
            }
        }
    }

    /// Release ownership of the thread (exclusive with `join`).
    pub fn detach(&self) {
        {
            let mut shared = self.core.shared.lock();
            if shared.joined {
                return;
            }
            shared.joined = true;
        }
        drop(self.handle.lock().take());
    }

    /// Best-effort CPU affinity for the worker thread.
    #[cfg(target_os = "linux")]
    pub fn assign_to(&self, cpu: usize) {
        use nix::sched::{sched_setaffinity, CpuSet};

        let Some(tid) = self.core.tid.get().copied() else {
            debug!(worker = self.core.id, cpu, "thread not started yet, affinity skipped");
            return;
        };
        let mut cpuset = CpuSet::new();
        if cpuset.set(cpu).is_err() {
            warn!(worker = self.core.id, cpu, "cpu outside the affinity mask range");
            return;
        }
        match sched_setaffinity(tid, &cpuset) {
            Ok(()) => debug!(worker = self.core.id, cpu, "worker pinned"),
            Err(err) => warn!(worker = self.core.id, cpu, %err, "sched_setaffinity failed"),
        }
    }

    /// Best-effort CPU affinity; not expressible on this platform.
    #[cfg(not(target_os = "linux"))]
    pub fn assign_to(&self, cpu: usize) {
        debug!(worker = self.core.id, cpu, "cpu affinity not supported on this platform");
    }

    /// Number of tasks whose `execute` has returned (skipped weak entries
    /// excluded).
    pub fn executed_count(&self) -> usize {
        self.core.executed.load(Ordering::Relaxed)
    }

    /// Number of queued entries not yet claimed.
    pub fn task_count(&self) -> usize {
        self.core.shared.lock().queue.len()
    }

    /// OS thread identifier, available once the thread has started.
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.core.thread_id.get().copied()
    }
}

impl Drop for Worker {
    // Finalize and detach so the thread cannot outlive the last handle
    // while still draining nothing.
    fn drop(&mut self) {
        self.quit();
        let already_joined = {
            let mut shared = self.core.shared.lock();
            let previous = shared.joined;
            shared.joined = true;
            previous
        };
        if !already_joined {
            drop(self.handle.lock().take());
        }
    }
}

fn run(core: Arc<Core>) {
    let _ = core.thread_id.set(thread::current().id());
    #[cfg(target_os = "linux")]
    let _ = core.tid.set(nix::unistd::gettid());
    debug!(worker = core.id, "worker thread started");

    loop {
        let mut task: Option<TaskPtr> = None;
        let observed;
        {
            let mut shared = core.shared.lock();
            if shared.state == WorkerState::Running && shared.queue.is_empty() {
                // Woken by add_task/add_weak_task/quit, or re-checks after 1 s.
                core.cond.wait_for(&mut shared, QUEUE_WAIT);
            }
            observed = shared.state;
            match shared.state {
                WorkerState::Finalized => break,
                WorkerState::Running => {
                    if let Some(entry) = shared.queue.pop_front() {
                        task = entry.claim();
                        if task.is_none() {
                            trace!(worker = core.id, "weak task gone before claim, skipped");
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some(task) = task {
            // `execute` contains its own panic capture; only a panicking
            // completion callback can unwind out of it. The worker must
            // outlive both.
            if catch_unwind(AssertUnwindSafe(|| task.execute())).is_ok() {
                core.executed.fetch_add(1, Ordering::Relaxed);
            } else {
                warn!(worker = core.id, "task callback panicked, worker continues");
            }
        } else if observed != WorkerState::Running {
            thread::sleep(PAUSED_BACKOFF);
        }
    }

    core.shared.lock().state = WorkerState::Exited;
    debug!(worker = core.id, "worker thread exited");
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
