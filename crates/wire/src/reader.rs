// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record scanning and sparse reads over an encoded buffer.

use crate::error::CodecError;
use crate::value::{ArgValue, RECORD_HEADER_LEN};
use std::ops::Range;

/// One scanned record: the slot id its header declares and where its
/// payload sits in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Record {
    slot_id: i32,
    payload: Range<usize>,
}

/// Parsed view over an encoded argument buffer.
///
/// Construction scans the record framing once; individual slots can then
/// be read sparsely and out of order without reparsing. That is the point
/// of the `(slot_id, size, bytes)` framing: transports can locate single
/// fields cheaply.
#[derive(Debug)]
pub struct ArgReader<'a> {
    buf: &'a [u8],
    records: Vec<Record>,
}

impl<'a> ArgReader<'a> {
    /// Scan every record in `buf`.
    pub fn parse(buf: &'a [u8]) -> Result<Self, CodecError> {
        Self::scan(buf, usize::MAX)
    }

    /// Scan exactly the first `count` records of `buf`, ignoring trailing
    /// bytes. Fails with `TruncatedInput` if fewer records are present.
    pub fn parse_n(buf: &'a [u8], count: usize) -> Result<Self, CodecError> {
        let reader = Self::scan(buf, count)?;
        if reader.records.len() < count {
            return Err(CodecError::TruncatedInput { slot: reader.records.len() });
        }
        Ok(reader)
    }

    fn scan(buf: &'a [u8], limit: usize) -> Result<Self, CodecError> {
        let mut records = Vec::new();
        let mut pos = 0usize;
        while pos < buf.len() && records.len() < limit {
            let header_end = pos + RECORD_HEADER_LEN;
            if header_end > buf.len() {
                return Err(CodecError::TruncatedInput { slot: records.len() });
            }
            let slot_id = read_i32(buf, pos);
            let size = read_i32(buf, pos + 4);
            if size < 0 {
                return Err(CodecError::InvalidSlot { slot: records.len() });
            }
            let payload_end = header_end + size as usize;
            if payload_end > buf.len() {
                return Err(CodecError::TruncatedInput { slot: records.len() });
            }
            records.push(Record { slot_id, payload: header_end..payload_end });
            pos = payload_end;
        }
        Ok(Self { buf, records })
    }

    /// Number of records scanned.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Slot id declared by the header of record `index`.
    pub fn slot_id(&self, index: usize) -> Option<i32> {
        self.records.get(index).map(|record| record.slot_id)
    }

    /// Read record `slot` as `V`. Slots can be read in any order, and more
    /// than once.
    pub fn read<V: ArgValue>(&self, slot: usize) -> Result<V, CodecError> {
        let record = self
            .records
            .get(slot)
            .ok_or(CodecError::InvalidSlot { slot })?;
        V::read_payload(slot, &self.buf[record.payload.clone()])
    }
}

fn read_i32(buf: &[u8], pos: usize) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[pos..pos + 4]);
    i32::from_ne_bytes(raw)
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
