// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot unit of work with an asynchronous result handle.
//!
//! A task binds a function and its inputs (captured by closure) together
//! with an optional completion callback. The worker thread runs it exactly
//! once; any thread can wait on the completion signal and borrow the
//! result slot afterwards.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tracing::warn;

/// Default wait used by result retrieval.
pub const DEFAULT_GET_TIMEOUT: Duration = Duration::from_millis(5000);

/// Lifecycle of a task. Exactly one terminal state is ever reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskState {
    Created = 0,
    Executing = 1,
    Finished = 2,
    Failed = 3,
}

mr_core::simple_display! {
    TaskState {
        Created   => "created",
        Executing => "executing",
        Finished  => "finished",
        Failed    => "failed",
    }
}

impl TaskState {
    fn from_u8(raw: u8) -> TaskState {
        match raw {
            1 => TaskState::Executing,
            2 => TaskState::Finished,
            3 => TaskState::Failed,
            _ => TaskState::Created,
        }
    }
}

/// Opaque handle to whatever a failed task panicked with.
///
/// The runtime renders the payload into a message for logs but does not
/// otherwise interpret it.
#[derive(Debug, Clone)]
pub struct TaskError {
    message: Arc<str>,
}

impl TaskError {
    fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message: Arc<str> = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).into()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.as_str().into()
        } else {
            "task panicked".into()
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TaskError {}

/// Result slot of a task: the return value at index 0 plus an indexed bag
/// of type-erased values a callback may scatter without extra allocation
/// points elsewhere.
pub struct TaskResult<R> {
    value: Option<R>,
    aux: BTreeMap<usize, Box<dyn Any + Send>>,
}

impl<R> TaskResult<R> {
    fn new() -> Self {
        Self { value: None, aux: BTreeMap::new() }
    }

    /// The return value, present once the task has finished.
    pub fn value(&self) -> Option<&R> {
        self.value.as_ref()
    }

    /// Move the return value out of the slot.
    pub fn take_value(&mut self) -> Option<R> {
        self.value.take()
    }

    /// Auxiliary entry at `index`, if one of type `T` was scattered there.
    pub fn aux<T: Any>(&self, index: usize) -> Option<&T> {
        self.aux.get(&index)?.downcast_ref()
    }

    /// Scatter an auxiliary value at `index` (indices other than 0 by
    /// convention; the return value owns index 0).
    pub fn set_aux<T: Any + Send>(&mut self, index: usize, value: T) {
        self.aux.insert(index, Box::new(value));
    }
}

/// Object-safe task surface the worker consumes.
pub trait TaskHandle: Send + Sync {
    /// Run the task to completion. The worker thread calls this exactly
    /// once; a second call is a logged no-op.
    fn execute(&self);

    fn state(&self) -> TaskState;

    /// True iff the task reached `Finished`.
    fn finished(&self) -> bool {
        self.state() == TaskState::Finished
    }

    /// True iff the task reached `Failed`.
    fn error(&self) -> bool {
        self.state() == TaskState::Failed
    }

    /// The captured failure, defined only when [`error`](Self::error) holds.
    fn exception(&self) -> Option<TaskError>;

    /// Wait for the completion signal. Returns whether the task completed
    /// within `timeout`.
    fn wait(&self, timeout: Duration) -> bool;
}

/// Shared task handle, as held by producers and queue entries.
pub type TaskPtr = Arc<dyn TaskHandle>;

/// Non-owning task handle; see [`Worker::add_weak_task`](crate::Worker::add_weak_task).
pub type WeakTaskPtr = Weak<dyn TaskHandle>;

/// Completion callback, invoked on the worker thread after the completion
/// signal, whatever the outcome.
pub type TaskCallback<R> = Box<dyn Fn(&Task<R>) + Send + Sync>;

/// A one-shot job: function, bound inputs, result slot, completion signal.
pub struct Task<R> {
    func: Mutex<Option<Box<dyn FnOnce() -> R + Send>>>,
    callback: Option<TaskCallback<R>>,
    state: AtomicU8,
    result: Mutex<TaskResult<R>>,
    panic: Mutex<Option<TaskError>>,
    done: Mutex<bool>,
    cond: Condvar,
}

impl<R: Send + 'static> Task<R> {
    /// Bind `func` (inputs captured by the closure) and an optional
    /// completion callback into a shared task.
    pub fn new<F>(func: F, callback: Option<TaskCallback<R>>) -> Arc<Self>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        Arc::new(Self {
            func: Mutex::new(Some(Box::new(func))),
            callback,
            state: AtomicU8::new(TaskState::Created as u8),
            result: Mutex::new(TaskResult::new()),
            panic: Mutex::new(None),
            done: Mutex::new(false),
            cond: Condvar::new(),
        })
    }

    /// Wait up to `timeout` for completion, then borrow the result slot.
    ///
    /// The borrow is handed back whether or not the task completed; callers
    /// distinguish success from timeout or failure via
    /// [`finished`](TaskHandle::finished). Note the guard locks the slot:
    /// holding it across a late completion delays the worker publishing
    /// the value, so drop it before re-polling.
    pub fn get(&self, timeout: Duration) -> MutexGuard<'_, TaskResult<R>> {
        self.wait(timeout);
        self.result.lock()
    }

    /// [`get`](Self::get) with the default 5 s timeout.
    pub fn get_default(&self) -> MutexGuard<'_, TaskResult<R>> {
        self.get(DEFAULT_GET_TIMEOUT)
    }
}

impl<R: Send + 'static> TaskHandle for Task<R> {
    fn execute(&self) {
        if TaskState::from_u8(self.state.load(Ordering::Acquire)) != TaskState::Created {
            warn!(state = %self.state(), "task already executed; ignoring");
            return;
        }
        self.state.store(TaskState::Executing as u8, Ordering::Release);

        let func = self.func.lock().take();
        match func {
            Some(func) => match catch_unwind(AssertUnwindSafe(func)) {
                Ok(value) => {
                    self.result.lock().value = Some(value);
                    self.state.store(TaskState::Finished as u8, Ordering::Release);
                }
                Err(payload) => {
                    *self.panic.lock() = Some(TaskError::from_panic(payload.as_ref()));
                    self.state.store(TaskState::Failed as u8, Ordering::Release);
                }
            },
            None => {
                self.state.store(TaskState::Finished as u8, Ordering::Release);
            }
        }

        {
            let mut done = self.done.lock();
            *done = true;
        }
        self.cond.notify_all();

        if let Some(callback) = &self.callback {
            callback(self);
        }
    }

    fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn exception(&self) -> Option<TaskError> {
        self.panic.lock().clone()
    }

    fn wait(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut done = self.done.lock();
        while !*done {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            self.cond.wait_for(&mut done, deadline - now);
        }
        *done
    }
}

/// Bind a function and callback into a shared task handle.
///
/// Inputs travel inside the closure; `make_task(move || work(a, b), None)`
/// is the argument-binding form.
pub fn make_task<R, F>(func: F, callback: Option<TaskCallback<R>>) -> Arc<Task<R>>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    Task::new(func, callback)
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
