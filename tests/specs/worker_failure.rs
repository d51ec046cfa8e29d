// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A failing task leaves the worker alive and draining.

use mr_runtime::{TaskHandle, Worker, WorkerState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn worker_keeps_draining_after_a_task_panics() {
    let worker = Worker::new(Vec::new());
    worker.start();

    let failing = worker.submit(|| -> i32 { panic!("deliberate failure") }, None);

    let ran = Arc::new(AtomicBool::new(false));
    let flag = ran.clone();
    let following = worker.submit(move || flag.store(true, Ordering::SeqCst), None);

    assert!(failing.wait(Duration::from_secs(2)));
    assert!(following.wait(Duration::from_secs(2)));

    assert!(failing.error());
    assert!(!failing.finished());
    assert_eq!(failing.exception().unwrap().message(), "deliberate failure");

    assert!(following.finished());
    assert!(ran.load(Ordering::SeqCst));

    assert_eq!(worker.state(), WorkerState::Running);
    assert_eq!(worker.executed_count(), 2);

    worker.quit();
    worker.join();
}
