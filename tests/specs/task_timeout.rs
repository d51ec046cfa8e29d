// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timed result retrieval has no side effects on the task.

use mr_runtime::{TaskHandle, Worker};
use std::time::{Duration, Instant};

#[test]
fn get_times_out_while_the_task_keeps_running() {
    let worker = Worker::new(Vec::new());
    worker.start();

    let task = worker.submit(
        || {
            std::thread::sleep(Duration::from_millis(100));
            5
        },
        None,
    );

    let started = Instant::now();
    let result = task.get(Duration::from_millis(10));
    assert!(started.elapsed() < Duration::from_millis(80), "get did not return promptly");
    assert!(!task.finished());
    assert!(result.value().is_none());
    drop(result);

    assert!(task.wait(Duration::from_secs(2)));
    assert!(task.finished());
    assert_eq!(task.get(Duration::ZERO).value(), Some(&5));

    worker.quit();
    worker.join();
}
