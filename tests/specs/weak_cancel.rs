// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weak queue entries are cancelled by dropping the last strong handle.

use mr_runtime::{make_task, TaskHandle, WeakTaskPtr, Worker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn dropping_the_producer_handle_cancels_a_weak_task() {
    let worker = Worker::new(Vec::new());
    worker.start();

    // Occupy the worker so the weak entry sits in the queue for a moment.
    let busy = worker.submit(
        || {
            std::thread::sleep(Duration::from_millis(50));
        },
        None,
    );
    std::thread::sleep(Duration::from_millis(5));

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    let task = make_task(
        move || {
            std::thread::sleep(Duration::from_millis(10));
            flag.store(true, Ordering::SeqCst);
        },
        None,
    );
    worker.add_weak_task(Arc::downgrade(&task) as WeakTaskPtr);
    drop(task);

    assert!(busy.wait(Duration::from_secs(2)));
    let deadline = Instant::now() + Duration::from_secs(2);
    while worker.task_count() > 0 {
        assert!(Instant::now() < deadline);
        std::thread::sleep(Duration::from_millis(1));
    }
    std::thread::sleep(Duration::from_millis(30));

    assert!(!cancelled.load(Ordering::SeqCst));
    assert_eq!(worker.executed_count(), 1);

    worker.quit();
    worker.join();
}
