// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide event-loop registry.

use crate::eventloop::{make_handler, EventLoop, EventLoopPtr, WeakHandlerRef};
use crate::worker::Worker;
use mr_core::message::MessagePtr;
use mr_wire::{pack_message, ArgTuple, CodecError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, warn};

static INSTANCE: OnceLock<EventLoopManager> = OnceLock::new();

/// Registry owning the process's event loops.
pub struct EventLoopManager {
    pool: RwLock<HashMap<i32, EventLoopPtr>>,
    shutdown: AtomicBool,
}

impl EventLoopManager {
    /// The process-wide instance.
    pub fn instance() -> &'static EventLoopManager {
        INSTANCE.get_or_init(|| EventLoopManager {
            pool: RwLock::new(HashMap::new()),
            shutdown: AtomicBool::new(false),
        })
    }

    /// Construct a loop over a fresh dedicated worker, optionally
    /// installing `handler` as the weak secondary handler, and retain it.
    ///
    /// The main handler of a manager-created loop accepts and ignores the
    /// message; dispatch still runs it before the secondary path.
    pub fn create(&self, handler: Option<WeakHandlerRef>) -> EventLoopPtr {
        let worker = Arc::new(Worker::new(Vec::new()));
        let evloop = EventLoop::new(worker, make_handler(|_mesg| {}));
        if let Some(handler) = handler {
            evloop.set_handler(handler);
        }
        if self.shutdown.load(Ordering::Acquire) {
            warn!(evloop = evloop.id(), "event-loop manager already shut down, loop is unmanaged");
            return evloop;
        }
        self.pool.write().insert(evloop.id(), evloop.clone());
        evloop
    }

    /// Weak lookup of a retained loop by id.
    pub fn get(&self, id: i32) -> Option<Weak<EventLoop>> {
        self.pool.read().get(&id).map(Arc::downgrade)
    }

    /// Number of retained loops.
    pub fn count(&self) -> usize {
        self.pool.read().len()
    }

    /// Post to a retained loop by id. Unknown ids are a logged no-op.
    pub fn post(&self, id: i32, mesg: MessagePtr) {
        let evloop = self.pool.read().get(&id).cloned();
        match evloop {
            Some(evloop) => evloop.post(mesg),
            None => warn!(evloop = id, "post to unknown event loop dropped"),
        }
    }

    /// Post directly to a loop handle.
    pub fn post_loop(&self, evloop: &EventLoopPtr, mesg: MessagePtr) {
        evloop.post(mesg);
    }

    /// Encode `args` through the codec and post to a retained loop by id.
    pub fn post_args<T: ArgTuple>(
        &self,
        id: i32,
        sender: &str,
        receiver: &str,
        args: &T,
    ) -> Result<(), CodecError> {
        let mesg = pack_message(sender, receiver, args)?;
        self.post(id, mesg);
        Ok(())
    }

    /// Stop every retained running loop and forbid further managed
    /// creation.
    pub fn quit(&self) {
        self.shutdown.store(true, Ordering::Release);
        let loops: Vec<EventLoopPtr> = self.pool.read().values().cloned().collect();
        for evloop in &loops {
            if evloop.is_running() {
                evloop.stop();
            }
        }
        debug!(count = loops.len(), "event-loop manager shut down");
    }

    /// Stop and drop every retained loop and re-arm the manager. Test
    /// scaffolding only: the singletons outlive each test.
    #[cfg(any(test, feature = "test-support"))]
    pub fn reset(&self) {
        let loops: Vec<EventLoopPtr> = self.pool.read().values().cloned().collect();
        for evloop in &loops {
            if evloop.is_running() {
                evloop.stop();
            }
            evloop.wait();
        }
        self.pool.write().clear();
        self.shutdown.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "eventloop_manager_tests.rs"]
mod tests;
