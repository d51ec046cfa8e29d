// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed-argument codec for message payloads.
//!
//! Wire format: one record per argument, `(slot_id: i32, size: i32, bytes)`
//! in native byte order. Fixed-size arithmetic types encode their raw
//! representation; text encodes its bytes, capped at [`MAX_TEXT_LEN`].
//! The framing is self-describing enough for transports to locate single
//! fields without a schema.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod dynamic;
mod encode;
mod error;
mod pack;
mod reader;
mod tuple;
mod value;

pub use dynamic::{decode_dyn, encode_dyn, Arg};
pub use encode::ArgEncoder;
pub use error::CodecError;
pub use pack::{pack_message, unpack_message};
pub use reader::ArgReader;
pub use tuple::{decode, encode, ArgTuple};
pub use value::{ArgKind, ArgValue, MAX_TEXT_LEN, RECORD_HEADER_LEN};
