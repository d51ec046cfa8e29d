// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded queue behavior under capacity pressure.

use mr_core::message::{Message, MessagePtr};
use mr_core::queue::{MesgQueue, QueueFull};

fn mesg(tag: u8) -> MessagePtr {
    Message::create("producer", "consumer", vec![tag])
}

#[test]
fn capacity_two_queue_under_pressure() {
    let queue = MesgQueue::new(2);
    assert_eq!(queue.len(), 0);

    queue.enqueue(mesg(b'a')).unwrap();
    assert_eq!(queue.len(), 1);
    queue.enqueue(mesg(b'b')).unwrap();
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.enqueue(mesg(b'c')), Err(QueueFull { capacity: 2 }));
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.dequeue().payload(), b"a");
    assert_eq!(queue.len(), 1);

    queue.enqueue(mesg(b'c')).unwrap();
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.dequeue().payload(), b"b");
    assert_eq!(queue.dequeue().payload(), b"c");
    assert!(queue.try_dequeue().is_none());
}
