// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tuple-shape declarations and whole-tuple encode/decode.

use crate::encode::ArgEncoder;
use crate::error::CodecError;
use crate::reader::ArgReader;
use crate::value::{min_encoded_len, ArgKind, ArgValue};

/// A statically declared tuple of slot values.
///
/// Implemented for tuples of [`ArgValue`] types up to arity 8. The
/// declared shape drives the streaming encoder's type checks and
/// whole-buffer decoding.
pub trait ArgTuple: Sized {
    /// Declared slot kinds, in order.
    const KINDS: &'static [ArgKind];

    /// Sum of the declared fixed widths (text slots contribute nothing).
    fn min_encoded_len() -> usize {
        min_encoded_len(Self::KINDS)
    }

    /// Encode the whole tuple into a fresh buffer.
    fn encode(&self) -> Result<Vec<u8>, CodecError>;

    /// Rebuild the tuple from a scanned reader, one slot per record.
    fn read_from(reader: &ArgReader<'_>) -> Result<Self, CodecError>;

    /// Decode a whole tuple from an encoded buffer. Trailing bytes after
    /// the declared records are ignored.
    fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        let reader = ArgReader::parse_n(buf, Self::KINDS.len())?;
        Self::read_from(&reader)
    }
}

macro_rules! arg_tuple {
    ($( ( $($name:ident : $idx:tt),+ ) )+) => {$(
        impl<$($name: ArgValue),+> ArgTuple for ($($name,)+) {
            const KINDS: &'static [ArgKind] = &[$($name::KIND),+];

            fn encode(&self) -> Result<Vec<u8>, CodecError> {
                let mut encoder = ArgEncoder::for_tuple::<Self>();
                $( encoder.append(&self.$idx)?; )+
                Ok(encoder.take())
            }

            fn read_from(reader: &ArgReader<'_>) -> Result<Self, CodecError> {
                Ok(($(reader.read::<$name>($idx)?,)+))
            }
        }
    )+};
}

arg_tuple! {
    (A:0)
    (A:0, B:1)
    (A:0, B:1, C:2)
    (A:0, B:1, C:2, D:3)
    (A:0, B:1, C:2, D:3, E:4)
    (A:0, B:1, C:2, D:3, E:4, F:5)
    (A:0, B:1, C:2, D:3, E:4, F:5, G:6)
    (A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7)
}

/// Encode a whole tuple into a fresh buffer.
pub fn encode<T: ArgTuple>(args: &T) -> Result<Vec<u8>, CodecError> {
    args.encode()
}

/// Decode a whole tuple from an encoded buffer.
pub fn decode<T: ArgTuple>(buf: &[u8]) -> Result<T, CodecError> {
    T::decode(buf)
}

#[cfg(test)]
#[path = "tuple_tests.rs"]
mod tests;
