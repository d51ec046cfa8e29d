// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[test]
fn new_timer_is_stopped() {
    let timer = Timer::new(Duration::from_millis(5));
    assert!(!timer.is_running());
    assert_eq!(timer.interval(), Duration::from_millis(5));
}

#[test]
fn started_timer_ticks_repeatedly() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();

    let timer = Timer::new(Duration::from_millis(5));
    timer.set_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    timer.start();
    assert!(timer.is_running());

    let deadline = Instant::now() + Duration::from_secs(2);
    while ticks.load(Ordering::SeqCst) < 3 {
        assert!(Instant::now() < deadline, "timer never reached 3 ticks");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn stop_pauses_ticking() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();

    let timer = Timer::new(Duration::from_millis(5));
    timer.set_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    timer.start();

    let deadline = Instant::now() + Duration::from_secs(2);
    while ticks.load(Ordering::SeqCst) == 0 {
        assert!(Instant::now() < deadline);
        thread::sleep(Duration::from_millis(1));
    }

    timer.stop();
    assert!(!timer.is_running());
    // Let any in-flight tick land, then expect silence.
    thread::sleep(Duration::from_millis(20));
    let frozen = ticks.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(30));
    assert_eq!(ticks.load(Ordering::SeqCst), frozen);
}

#[test]
fn timer_without_a_callback_just_ticks() {
    let timer = Timer::new(Duration::from_millis(2));
    timer.start();
    thread::sleep(Duration::from_millis(10));
    // Nothing to observe; it must simply not crash.
}

#[test]
fn panicking_callback_does_not_kill_the_timer() {
    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();

    let timer = Timer::new(Duration::from_millis(3));
    timer.set_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        panic!("tick exploded");
    });
    timer.start();

    let deadline = Instant::now() + Duration::from_secs(2);
    while ticks.load(Ordering::SeqCst) < 2 {
        assert!(Instant::now() < deadline, "timer died after a panicking tick");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn set_interval_applies_to_later_periods() {
    let timer = Timer::new(Duration::from_millis(50));
    timer.set_interval(Duration::from_millis(2));
    assert_eq!(timer.interval(), Duration::from_millis(2));

    let ticks = Arc::new(AtomicUsize::new(0));
    let counter = ticks.clone();
    timer.set_callback(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    timer.start();

    let deadline = Instant::now() + Duration::from_secs(2);
    while ticks.load(Ordering::SeqCst) == 0 {
        assert!(Instant::now() < deadline);
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn drop_shuts_the_thread_down() {
    let timer = Timer::new(Duration::from_millis(1));
    timer.start();
    thread::sleep(Duration::from_millis(5));
    drop(timer);
    // Drop joins the thread; reaching this line is the assertion.
}
