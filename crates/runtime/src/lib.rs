// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mr-runtime: the in-process concurrency runtime of the mailroom toolkit.
//!
//! A [`Worker`] runs tasks on its own OS thread; an [`EventLoop`] binds one
//! worker to message handlers and turns every posted [`MessagePtr`] into a
//! [`Task`]; the two manager singletons own the long-lived workers and
//! loops and shut them down at process teardown.
//!
//! [`MessagePtr`]: mr_core::message::MessagePtr

pub mod eventloop;
pub mod eventloop_manager;
pub mod task;
pub mod timer;
pub mod worker;
pub mod worker_manager;

pub use eventloop::{
    make_handler, EventLoop, EventLoopPtr, HandlerFn, HandlerRef, LoopState, WeakHandlerRef,
};
pub use eventloop_manager::EventLoopManager;
pub use task::{
    make_task, Task, TaskCallback, TaskError, TaskHandle, TaskPtr, TaskResult, TaskState,
    WeakTaskPtr, DEFAULT_GET_TIMEOUT,
};
pub use timer::Timer;
pub use worker::{QueueEntry, Worker, WorkerPtr, WorkerState};
pub use worker_manager::WorkerManager;
