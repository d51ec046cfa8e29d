// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message value type shared between producers, queues, and consumers.

use crate::id::{next_id, IdKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handle to an immutable [`Message`].
///
/// Ownership is shared among the producer, any queue holding the message,
/// and the consumer, until the last handle drops.
pub type MessagePtr = Arc<Message>;

/// Immutable message value: identifier, endpoint names, opaque payload.
///
/// The payload is typically an encoded argument tuple (see `mr-wire`), but
/// the core treats it as bytes. Payload length must fit in a `u32`; that is
/// the codec's record-count limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: i32,
    sender: String,
    receiver: String,
    payload: Vec<u8>,
}

impl Message {
    /// Build a message with a fresh identifier and return the shared handle.
    pub fn create(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> MessagePtr {
        let payload = payload.into();
        debug_assert!(
            payload.len() <= u32::MAX as usize,
            "message payload of {} bytes exceeds the u32 size limit",
            payload.len(),
        );
        Arc::new(Self {
            id: next_id(IdKind::Message),
            sender: sender.into(),
            receiver: receiver.into(),
            payload,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
