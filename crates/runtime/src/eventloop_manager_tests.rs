// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::eventloop::LoopState;
use mr_core::message::Message;
use mr_wire::unpack_message;
use parking_lot::Mutex;
use serial_test::serial;
use std::time::{Duration, Instant};

fn drain(evloop: &EventLoopPtr) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while evloop.worker().task_count() > 0 {
        assert!(Instant::now() < deadline, "loop worker never drained");
        std::thread::sleep(Duration::from_millis(1));
    }
    std::thread::sleep(Duration::from_millis(10));
}

#[test]
#[serial]
fn instance_is_process_wide() {
    let first = EventLoopManager::instance() as *const EventLoopManager;
    let second = EventLoopManager::instance() as *const EventLoopManager;
    assert_eq!(first, second);
}

#[test]
#[serial]
fn create_pairs_each_loop_with_its_own_worker() {
    let man = EventLoopManager::instance();
    man.reset();

    let first = man.create(None);
    let second = man.create(None);

    assert_eq!(man.count(), 2);
    assert_ne!(first.worker().id(), second.worker().id());
    assert_eq!(first.state(), LoopState::Created);

    man.reset();
}

#[test]
#[serial]
fn posted_messages_reach_the_secondary_handler() {
    let man = EventLoopManager::instance();
    man.reset();

    let received = std::sync::Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let handler = make_handler(move |mesg: MessagePtr| {
        let (value,): (i32,) = unpack_message(&mesg).unwrap();
        sink.lock().push(value);
    });

    let evloop = man.create(Some(Arc::downgrade(&handler)));
    evloop.start();

    man.post_args(evloop.id(), "origin", "target", &(41i32,)).unwrap();
    man.post(evloop.id(), Message::create("origin", "target", mr_wire::encode(&(42i32,)).unwrap()));
    drain(&evloop);

    assert_eq!(*received.lock(), vec![41, 42]);
    man.reset();
}

#[test]
#[serial]
fn get_returns_an_upgradable_weak_handle() {
    let man = EventLoopManager::instance();
    man.reset();

    let evloop = man.create(None);
    let weak = man.get(evloop.id()).unwrap();
    assert_eq!(weak.upgrade().unwrap().id(), evloop.id());

    assert!(man.get(evloop.id() + 1000).is_none());
    man.reset();
}

#[test]
#[serial]
fn post_to_an_unknown_id_is_dropped() {
    let man = EventLoopManager::instance();
    man.reset();

    // Nothing registered; must not crash.
    man.post(424_242, Message::create("a", "b", vec![0u8]));
    man.reset();
}

#[test]
#[serial]
fn quit_stops_every_running_loop() {
    let man = EventLoopManager::instance();
    man.reset();

    let running = man.create(None);
    let idle = man.create(None);
    running.start();

    man.quit();

    assert_eq!(running.state(), LoopState::Stopped);
    assert_eq!(idle.state(), LoopState::Created);

    man.reset();
}

#[test]
#[serial]
fn create_after_shutdown_is_unmanaged() {
    let man = EventLoopManager::instance();
    man.reset();
    man.quit();

    let evloop = man.create(None);
    assert_eq!(man.count(), 0);
    assert!(man.get(evloop.id()).is_none());

    man.reset();
}
