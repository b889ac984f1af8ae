// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::Bytes;

/// Payload of a nil BulkString. `$-1\r\n` parses to `Bulk(NIL)` and
/// `Bulk(NIL)` serializes back to `$-1\r\n`.
pub const NIL: &[u8] = b"nil";

/// A single MESP value.
///
/// SimpleString and Error are CRLF-free text; BulkString carries arbitrary
/// bytes. Integers are 64-bit signed, Floats 32-bit.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `+…\r\n`
    Simple(String),
    /// `-…\r\n`
    Error(String),
    /// `:…\r\n`
    Int(i64),
    /// `#…\r\n`
    Float(f32),
    /// `$<len>\r\n…\r\n`, nil as `$-1\r\n`
    Bulk(Bytes),
    /// `*<count>\r\n` followed by that many values
    Array(Vec<Value>),
}

impl Value {
    /// Builds a BulkString from anything byte-like.
    pub fn bulk(payload: impl Into<Bytes>) -> Self {
        Value::Bulk(payload.into())
    }

    /// Builds a BulkString from UTF-8 text.
    pub fn bulk_str(payload: &str) -> Self {
        Value::Bulk(Bytes::copy_from_slice(payload.as_bytes()))
    }

    /// The nil BulkString.
    pub fn nil() -> Self {
        Value::Bulk(Bytes::from_static(NIL))
    }

    /// Payload of a BulkString, if this is one.
    pub fn as_bulk(&self) -> Option<&Bytes> {
        match self {
            Value::Bulk(b) => Some(b),
            _ => None,
        }
    }

    /// BulkString payload viewed as UTF-8, used for verb matching.
    pub fn as_verb(&self) -> Option<&str> {
        match self {
            Value::Bulk(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Integer payload, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Float payload, if this is one.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}
