// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named consumer binding one worker to message handlers.
//!
//! Every posted message becomes one task on the bound worker, so delivery
//! within a loop is FIFO in `post` order. Dispatch always tries the main
//! handler first and then the secondary handler; both are reached through
//! weak references upgraded at execution time, so a handler that has gone
//! away is skipped rather than crashed into.

use crate::task::Task;
use crate::worker::{WorkerPtr, WorkerState};
use mr_core::id::{next_id, IdKind};
use mr_core::message::MessagePtr;
use mr_wire::{pack_message, ArgTuple, CodecError};
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

/// Message handler installed on an event loop.
pub type HandlerFn = dyn Fn(MessagePtr) + Send + Sync;

/// Owning handler reference; keep it alive for as long as dispatch should
/// reach it.
pub type HandlerRef = Arc<HandlerFn>;

/// Non-owning handler reference; dispatch silently skips it once expired.
pub type WeakHandlerRef = Weak<HandlerFn>;

/// Wrap a closure as an installable handler.
pub fn make_handler<F>(handler: F) -> HandlerRef
where
    F: Fn(MessagePtr) + Send + Sync + 'static,
{
    Arc::new(handler)
}

/// Lifecycle of an event loop. A stopped loop cannot be restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Created,
    Running,
    Stopped,
}

mr_core::simple_display! {
    LoopState {
        Created => "created",
        Running => "running",
        Stopped => "stopped",
    }
}

/// Shared handle to an event loop.
pub type EventLoopPtr = Arc<EventLoop>;

/// A named consumer that turns each posted message into one task on its
/// bound worker.
pub struct EventLoop {
    id: i32,
    state: RwLock<LoopState>,
    main_handler: HandlerRef,
    sub_handler: Mutex<Option<WeakHandlerRef>>,
    worker: WorkerPtr,
}

impl EventLoop {
    /// Bind `worker` to `run`, the loop's main handler. A worker is
    /// required; the loop starts `Created` and consumes nothing until
    /// [`start`](Self::start).
    pub fn new(worker: WorkerPtr, run: HandlerRef) -> EventLoopPtr {
        Arc::new(Self {
            id: next_id(IdKind::EventLoop),
            state: RwLock::new(LoopState::Created),
            main_handler: run,
            sub_handler: Mutex::new(None),
            worker,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn state(&self) -> LoopState {
        *self.state.read()
    }

    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    /// The bound worker.
    pub fn worker(&self) -> &WorkerPtr {
        &self.worker
    }

    /// Move `Created → Running` and start the worker. Returns whether the
    /// transition happened; anything else is a logged no-op.
    pub fn start(&self) -> bool {
        {
            let mut state = self.state.write();
            if *state != LoopState::Created {
                let state = *state;
                warn!(evloop = self.id, %state, "start ignored");
                return false;
            }
            *state = LoopState::Running;
        }
        self.worker.start();
        debug!(evloop = self.id, worker = self.worker.id(), "event loop started");
        true
    }

    /// Move `Running → Stopped` and finalize the worker. Returns whether
    /// the transition happened; anything else is a logged no-op.
    pub fn stop(&self) -> bool {
        {
            let mut state = self.state.write();
            if *state != LoopState::Running {
                let state = *state;
                warn!(evloop = self.id, %state, "stop ignored");
                return false;
            }
            *state = LoopState::Stopped;
        }
        self.worker.quit();
        debug!(evloop = self.id, "event loop stopped");
        true
    }

    /// Join the worker of a stopped loop.
    pub fn wait(&self) {
        if self.state() == LoopState::Stopped && self.worker.state() != WorkerState::Exited {
            self.worker.join();
        }
    }

    /// Install (or replace) the secondary handler. Held weakly: the caller
    /// keeps the owning [`HandlerRef`], and dispatch skips the secondary
    /// path once it expires.
    pub fn set_handler(&self, handler: WeakHandlerRef) {
        *self.sub_handler.lock() = Some(handler);
    }

    /// Queue `mesg` for dispatch.
    ///
    /// Posting to a stopped loop silently drops the message: producers
    /// racing a concurrent `stop` are expected, not an error.
    pub fn post(&self, mesg: MessagePtr) {
        if self.state() == LoopState::Stopped {
            trace!(evloop = self.id, mesg = mesg.id(), "message dropped, loop stopped");
            return;
        }
        let main = Arc::downgrade(&self.main_handler);
        let sub = self.sub_handler.lock().clone();
        let id = self.id;
        let task = Task::new(
            move || dispatch(mesg, main, sub),
            Some(Box::new(move |_task: &Task<()>| {
                trace!(evloop = id, "dispatch complete");
            })),
        );
        self.worker.add_task(task);
    }

    /// Encode `args` through the codec and post the resulting message.
    /// Encoding failures surface here, synchronously in the producer.
    pub fn post_args<T: ArgTuple>(
        &self,
        sender: &str,
        receiver: &str,
        args: &T,
    ) -> Result<(), CodecError> {
        let mesg = pack_message(sender, receiver, args)?;
        self.post(mesg);
        Ok(())
    }
}

/// The dispatch path of one message: main handler first, then the
/// secondary handler if its weak reference still upgrades.
fn dispatch(mesg: MessagePtr, main: WeakHandlerRef, sub: Option<WeakHandlerRef>) {
    if let Some(handler) = main.upgrade() {
        handler(mesg.clone());
    }
    if let Some(handler) = sub.and_then(|weak| weak.upgrade()) {
        handler(mesg);
    }
}

#[cfg(test)]
#[path = "eventloop_tests.rs"]
mod tests;
