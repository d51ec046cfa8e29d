// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Packing argument tuples into messages and back.

use crate::error::CodecError;
use crate::tuple::ArgTuple;
use mr_core::message::{Message, MessagePtr};

/// Encode `args` and wrap the bytes as a fresh message payload.
pub fn pack_message<T: ArgTuple>(
    sender: &str,
    receiver: &str,
    args: &T,
) -> Result<MessagePtr, CodecError> {
    let payload = args.encode()?;
    Ok(Message::create(sender, receiver, payload))
}

/// Decode a message payload as the declared tuple shape.
pub fn unpack_message<T: ArgTuple>(mesg: &Message) -> Result<T, CodecError> {
    T::decode(mesg.payload())
}

#[cfg(test)]
#[path = "pack_tests.rs"]
mod tests;
