// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end flow through the process-wide manager singletons.

use mr_core::message::MessagePtr;
use mr_runtime::{make_handler, EventLoopManager, WorkerManager, WorkerState};
use mr_wire::unpack_message;
use parking_lot::Mutex;
use serial_test::serial;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
#[serial]
fn managed_loop_delivers_typed_posts_by_id() {
    let loops = EventLoopManager::instance();
    loops.reset();

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let handler = make_handler(move |mesg: MessagePtr| {
        let (value, label): (i32, String) = unpack_message(&mesg).unwrap();
        sink.lock().push((value, label));
    });

    let evloop = loops.create(Some(Arc::downgrade(&handler)));
    evloop.start();

    loops
        .post_args(evloop.id(), "origin", "target", &(5i32, String::from("ok")))
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    while received.lock().is_empty() {
        assert!(Instant::now() < deadline, "managed loop never delivered");
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(received.lock()[0], (5, String::from("ok")));

    loops.reset();
}

#[test]
#[serial]
fn quit_all_tears_down_every_managed_worker() {
    let workers = WorkerManager::instance();
    workers.reset();

    let first = workers.create(Vec::new(), false);
    let second = workers.create(Vec::new(), false);
    first.start();
    second.start();

    first.submit(|| std::thread::sleep(Duration::from_millis(10)), None);
    assert!(workers.wait(&first, Duration::from_secs(2)));

    workers.quit_all();
    assert_eq!(first.state(), WorkerState::Exited);
    assert_eq!(second.state(), WorkerState::Exited);

    workers.reset();
}

#[test]
#[serial]
fn manager_quit_stops_managed_loops_and_drops_late_posts() {
    let loops = EventLoopManager::instance();
    loops.reset();

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let handler = make_handler(move |mesg: MessagePtr| {
        let (value,): (i32,) = unpack_message(&mesg).unwrap();
        sink.lock().push(value);
    });

    let evloop = loops.create(Some(Arc::downgrade(&handler)));
    evloop.start();

    loops.post_args(evloop.id(), "a", "b", &(1i32,)).unwrap();
    let deadline = Instant::now() + Duration::from_secs(2);
    while received.lock().is_empty() {
        assert!(Instant::now() < deadline);
        std::thread::sleep(Duration::from_millis(1));
    }

    loops.quit();
    assert!(!evloop.is_running());

    // A post racing the shutdown is silently dropped.
    loops.post_args(evloop.id(), "a", "b", &(2i32,)).unwrap();
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(*received.lock(), vec![1]);

    loops.reset();
}
