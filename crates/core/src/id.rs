// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide identifier source.
//!
//! Each entity kind draws from its own counter, so ids are unique and
//! monotonically increasing within a kind but unrelated across kinds.
//! Ids are never reused for the lifetime of the process.

use std::sync::atomic::{AtomicI32, Ordering};

/// Entity kinds that receive identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    EventLoop,
    Worker,
    Message,
}

const KIND_COUNT: usize = 3;

static COUNTERS: [AtomicI32; KIND_COUNT] =
    [AtomicI32::new(0), AtomicI32::new(0), AtomicI32::new(0)];

/// Hand out the next identifier for `kind`. The first id of each kind is 1.
pub fn next_id(kind: IdKind) -> i32 {
    COUNTERS[kind as usize].fetch_add(1, Ordering::Relaxed) + 1
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
