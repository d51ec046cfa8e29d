// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-slot value types and their byte representations.

use crate::error::CodecError;

/// Longest permitted text payload, in bytes.
pub const MAX_TEXT_LEN: usize = 10 * 1024;

/// Byte length of the `(slot_id, size)` record header.
pub const RECORD_HEADER_LEN: usize = 8;

/// Runtime tag for each supported slot type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Str,
}

mr_core::simple_display! {
    ArgKind {
        Bool => "bool",
        I8   => "i8",
        U8   => "u8",
        I16  => "i16",
        U16  => "u16",
        I32  => "i32",
        U32  => "u32",
        I64  => "i64",
        U64  => "u64",
        F32  => "f32",
        F64  => "f64",
        Str  => "text",
    }
}

impl ArgKind {
    /// Payload width for fixed-size kinds; `None` for text.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            ArgKind::Bool | ArgKind::I8 | ArgKind::U8 => Some(1),
            ArgKind::I16 | ArgKind::U16 => Some(2),
            ArgKind::I32 | ArgKind::U32 | ArgKind::F32 => Some(4),
            ArgKind::I64 | ArgKind::U64 | ArgKind::F64 => Some(8),
            ArgKind::Str => None,
        }
    }
}

/// Sum of the fixed widths declared by `kinds` (text slots contribute nothing).
pub(crate) fn min_encoded_len(kinds: &[ArgKind]) -> usize {
    kinds.iter().filter_map(|kind| kind.fixed_width()).sum()
}

/// A value that can occupy one slot of an encoded argument tuple.
pub trait ArgValue: Sized {
    /// Runtime tag checked against the declared slot type on encode.
    const KIND: ArgKind;

    /// Number of payload bytes this value encodes to.
    fn payload_len(&self) -> usize;

    /// Append the payload bytes (no record header).
    fn write_payload(&self, out: &mut Vec<u8>);

    /// Rebuild a value from exactly the payload bytes of record `record`.
    fn read_payload(record: usize, bytes: &[u8]) -> Result<Self, CodecError>;
}

macro_rules! numeric_arg {
    ($($ty:ty => $kind:ident),+ $(,)?) => {$(
        impl ArgValue for $ty {
            const KIND: ArgKind = ArgKind::$kind;

            fn payload_len(&self) -> usize {
                std::mem::size_of::<$ty>()
            }

            fn write_payload(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_ne_bytes());
            }

            fn read_payload(record: usize, bytes: &[u8]) -> Result<Self, CodecError> {
                let raw: [u8; std::mem::size_of::<$ty>()] = bytes
                    .try_into()
                    .map_err(|_| CodecError::TruncatedInput { slot: record })?;
                Ok(<$ty>::from_ne_bytes(raw))
            }
        }
    )+};
}

numeric_arg! {
    i8  => I8,
    u8  => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

impl ArgValue for bool {
    const KIND: ArgKind = ArgKind::Bool;

    fn payload_len(&self) -> usize {
        1
    }

    fn write_payload(&self, out: &mut Vec<u8>) {
        out.push(u8::from(*self));
    }

    fn read_payload(record: usize, bytes: &[u8]) -> Result<Self, CodecError> {
        match bytes {
            [raw] => Ok(*raw != 0),
            _ => Err(CodecError::TruncatedInput { slot: record }),
        }
    }
}

impl ArgValue for String {
    const KIND: ArgKind = ArgKind::Str;

    fn payload_len(&self) -> usize {
        self.len()
    }

    fn write_payload(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.as_bytes());
    }

    // Payloads arrive from arbitrary transports; tolerate non-UTF-8 content
    // rather than failing the whole tuple.
    fn read_payload(_record: usize, bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
