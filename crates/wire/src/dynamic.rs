// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kind-tagged slot values for consumers without a declared tuple shape.
//!
//! Brokers and transports relay payloads they did not declare; they know
//! the shape only as a list of [`ArgKind`]s. [`Arg`] carries one decoded
//! slot together with its runtime kind, and pairs with
//! [`ArgReader::read_as`] and [`ArgEncoder::append_arg`] for
//! decode-inspect-reencode flows.

use crate::encode::ArgEncoder;
use crate::error::CodecError;
use crate::reader::ArgReader;
use crate::value::{ArgKind, ArgValue};

/// One slot value with its runtime kind attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
}

impl Arg {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Bool(_) => ArgKind::Bool,
            Arg::I8(_) => ArgKind::I8,
            Arg::U8(_) => ArgKind::U8,
            Arg::I16(_) => ArgKind::I16,
            Arg::U16(_) => ArgKind::U16,
            Arg::I32(_) => ArgKind::I32,
            Arg::U32(_) => ArgKind::U32,
            Arg::I64(_) => ArgKind::I64,
            Arg::U64(_) => ArgKind::U64,
            Arg::F32(_) => ArgKind::F32,
            Arg::F64(_) => ArgKind::F64,
            Arg::Str(_) => ArgKind::Str,
        }
    }
}

impl std::fmt::Display for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Bool(value) => write!(f, "{value}"),
            Arg::I8(value) => write!(f, "{value}"),
            Arg::U8(value) => write!(f, "{value}"),
            Arg::I16(value) => write!(f, "{value}"),
            Arg::U16(value) => write!(f, "{value}"),
            Arg::I32(value) => write!(f, "{value}"),
            Arg::U32(value) => write!(f, "{value}"),
            Arg::I64(value) => write!(f, "{value}"),
            Arg::U64(value) => write!(f, "{value}"),
            Arg::F32(value) => write!(f, "{value}"),
            Arg::F64(value) => write!(f, "{value}"),
            Arg::Str(value) => write!(f, "{value:?}"),
        }
    }
}

impl ArgReader<'_> {
    /// Read record `slot` as the value `kind` describes.
    pub fn read_as(&self, slot: usize, kind: ArgKind) -> Result<Arg, CodecError> {
        let arg = match kind {
            ArgKind::Bool => Arg::Bool(self.read(slot)?),
            ArgKind::I8 => Arg::I8(self.read(slot)?),
            ArgKind::U8 => Arg::U8(self.read(slot)?),
            ArgKind::I16 => Arg::I16(self.read(slot)?),
            ArgKind::U16 => Arg::U16(self.read(slot)?),
            ArgKind::I32 => Arg::I32(self.read(slot)?),
            ArgKind::U32 => Arg::U32(self.read(slot)?),
            ArgKind::I64 => Arg::I64(self.read(slot)?),
            ArgKind::U64 => Arg::U64(self.read(slot)?),
            ArgKind::F32 => Arg::F32(self.read(slot)?),
            ArgKind::F64 => Arg::F64(self.read(slot)?),
            ArgKind::Str => Arg::Str(self.read(slot)?),
        };
        Ok(arg)
    }

    /// Read every record according to `kinds`, in order.
    pub fn read_all(&self, kinds: &[ArgKind]) -> Result<Vec<Arg>, CodecError> {
        kinds
            .iter()
            .enumerate()
            .map(|(slot, kind)| self.read_as(slot, *kind))
            .collect()
    }
}

impl ArgEncoder {
    /// Append a kind-tagged value. Subject to the same declared-order type
    /// check as the typed [`append`](ArgEncoder::append).
    pub fn append_arg(&mut self, arg: &Arg) -> Result<&mut Self, CodecError> {
        match arg {
            Arg::Bool(value) => self.append(value),
            Arg::I8(value) => self.append(value),
            Arg::U8(value) => self.append(value),
            Arg::I16(value) => self.append(value),
            Arg::U16(value) => self.append(value),
            Arg::I32(value) => self.append(value),
            Arg::U32(value) => self.append(value),
            Arg::I64(value) => self.append(value),
            Arg::U64(value) => self.append(value),
            Arg::F32(value) => self.append(value),
            Arg::F64(value) => self.append(value),
            Arg::Str(value) => self.append(value),
        }
    }
}

/// Decode a buffer whose shape is only known at runtime.
pub fn decode_dyn(buf: &[u8], kinds: &[ArgKind]) -> Result<Vec<Arg>, CodecError> {
    let reader = ArgReader::parse_n(buf, kinds.len())?;
    reader.read_all(kinds)
}

/// Re-encode kind-tagged values into a fresh buffer.
pub fn encode_dyn(args: &[Arg]) -> Result<Vec<u8>, CodecError> {
    let kinds: Vec<ArgKind> = args.iter().map(Arg::kind).collect();
    let mut encoder = ArgEncoder::new(kinds);
    for arg in args {
        encoder.append_arg(arg)?;
    }
    Ok(encoder.take())
}

#[cfg(test)]
#[path = "dynamic_tests.rs"]
mod tests;
