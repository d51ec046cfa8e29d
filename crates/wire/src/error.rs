// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codec error taxonomy.

use crate::value::ArgKind;
use thiserror::Error;

/// Errors surfaced synchronously by the argument codec.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// A value's runtime type did not match the declared slot type.
    #[error("argument at slot {slot} is out of order: declared {expected}, got {found}")]
    TypeOrder {
        slot: usize,
        expected: ArgKind,
        found: ArgKind,
    },

    /// A text argument exceeded [`MAX_TEXT_LEN`](crate::MAX_TEXT_LEN).
    #[error("text argument of {len} bytes exceeds the {limit}-byte limit")]
    OversizedArgument { len: usize, limit: usize },

    /// The finished buffer failed the whole-tuple sanity re-parse.
    #[error("encoded buffer holds {actual} bytes, less than the declared minimum {expected}")]
    EncodingIntegrity { expected: usize, actual: usize },

    /// The buffer ended before record `slot` could be read.
    #[error("input truncated at record {slot}")]
    TruncatedInput { slot: usize },

    /// A record header carried an unusable slot id or size, or a read
    /// addressed a slot the buffer does not hold.
    #[error("invalid slot {slot}")]
    InvalidSlot { slot: usize },
}
