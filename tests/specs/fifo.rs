// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! FIFO delivery through one event loop.

use mr_core::message::MessagePtr;
use mr_runtime::{make_handler, EventLoop, Worker};
use mr_wire::unpack_message;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn posts_are_delivered_in_order() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();

    let worker = Arc::new(Worker::new(Vec::new()));
    let evloop = EventLoop::new(
        worker,
        make_handler(move |mesg: MessagePtr| {
            let (value,): (i32,) = unpack_message(&mesg).unwrap();
            sink.lock().push(value);
        }),
    );
    evloop.start();

    for value in [1, 2, 3, 4, 5] {
        evloop.post_args("producer", "consumer", &(value,)).unwrap();
    }

    let deadline = Instant::now() + Duration::from_secs(2);
    while received.lock().len() < 5 {
        assert!(Instant::now() < deadline, "loop never delivered all five messages");
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(*received.lock(), vec![1, 2, 3, 4, 5]);

    evloop.stop();
    evloop.wait();
}
