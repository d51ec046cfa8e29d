// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming encoder for declared argument tuples.

use crate::error::CodecError;
use crate::reader::ArgReader;
use crate::tuple::ArgTuple;
use crate::value::{min_encoded_len, ArgKind, ArgValue, MAX_TEXT_LEN};

/// Streaming encoder for a declared tuple shape.
///
/// `append` must be called once per declared slot, in order. After the
/// last slot the whole buffer is re-parsed as a sanity check and the slot
/// index wraps to zero; the next `append` then starts a fresh buffer, so
/// one encoder can serialize a stream of tuples.
#[derive(Debug)]
pub struct ArgEncoder {
    kinds: Vec<ArgKind>,
    index: usize,
    buf: Vec<u8>,
}

impl ArgEncoder {
    /// Encoder declared from a tuple type.
    pub fn for_tuple<T: ArgTuple>() -> Self {
        Self::new(T::KINDS.to_vec())
    }

    /// Encoder declared from an explicit kind list.
    pub fn new(kinds: Vec<ArgKind>) -> Self {
        Self { kinds, index: 0, buf: Vec::new() }
    }

    /// Number of declared slots.
    pub fn arity(&self) -> usize {
        self.kinds.len()
    }

    /// Slot the next `append` will fill.
    pub fn slot(&self) -> usize {
        self.index
    }

    /// Append the next argument.
    ///
    /// Fails with `TypeOrder` when the value's type does not match the
    /// declared slot, `OversizedArgument` for text beyond [`MAX_TEXT_LEN`],
    /// and `EncodingIntegrity` when the completed buffer fails its re-parse.
    /// On error the slot index is unchanged except for `EncodingIntegrity`,
    /// which resets the encoder.
    pub fn append<V: ArgValue>(&mut self, value: &V) -> Result<&mut Self, CodecError> {
        let declared = match self.kinds.get(self.index) {
            Some(kind) => *kind,
            None => return Err(CodecError::InvalidSlot { slot: self.index }),
        };
        if V::KIND != declared {
            return Err(CodecError::TypeOrder {
                slot: self.index,
                expected: declared,
                found: V::KIND,
            });
        }
        let size = value.payload_len();
        if V::KIND == ArgKind::Str && size > MAX_TEXT_LEN {
            return Err(CodecError::OversizedArgument { len: size, limit: MAX_TEXT_LEN });
        }

        if self.index == 0 {
            self.buf.clear();
        }
        self.buf.extend_from_slice(&(self.index as i32).to_ne_bytes());
        self.buf.extend_from_slice(&(size as i32).to_ne_bytes());
        value.write_payload(&mut self.buf);

        if self.index + 1 == self.kinds.len() {
            if let Err(err) = self.verify() {
                self.clear();
                return Err(err);
            }
        }
        self.index = (self.index + 1) % self.kinds.len();
        Ok(self)
    }

    // Whole-buffer re-parse after the final slot: the encoded size must
    // cover every declared fixed width and the framing must scan cleanly.
    fn verify(&self) -> Result<(), CodecError> {
        let expected = min_encoded_len(&self.kinds);
        if self.buf.len() < expected || ArgReader::parse_n(&self.buf, self.kinds.len()).is_err() {
            return Err(CodecError::EncodingIntegrity { expected, actual: self.buf.len() });
        }
        Ok(())
    }

    /// Encoded bytes of the current tuple.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Take the buffer out, leaving the encoder ready for a fresh tuple.
    pub fn take(&mut self) -> Vec<u8> {
        self.index = 0;
        std::mem::take(&mut self.buf)
    }

    /// True once every declared slot of the current tuple has been appended.
    pub fn is_complete(&self) -> bool {
        self.index == 0 && !self.buf.is_empty()
    }

    /// Reset the slot counter and drop any buffered bytes.
    pub fn clear(&mut self) {
        self.index = 0;
        self.buf.clear();
    }
}

#[cfg(test)]
#[path = "encode_tests.rs"]
mod tests;
