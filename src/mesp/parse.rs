// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::{Buf, Bytes};
use thiserror::Error;

use crate::mesp::value::{NIL, Value};

/// Parse failures for a single frame. The dispatcher boundary renders these
/// on the wire as `ERROR: <detail>`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MespError {
    #[error("empty input")]
    Empty,
    #[error("missing CRLF terminator")]
    MissingCrlf,
    #[error("bulk string shorter than declared")]
    ShortBulk,
    #[error("invalid length prefix")]
    BadLength,
    #[error("invalid integer literal")]
    BadInt,
    #[error("invalid float literal")]
    BadFloat,
    #[error("unknown MESP type {0:#04x}")]
    UnknownType(u8),
}

/// Parses one MESP value off the front of `input`, consuming exactly the
/// bytes that make it up. The caller must already hold a complete frame;
/// parsing never suspends waiting for more bytes.
pub fn parse(input: &mut Bytes) -> Result<Value, MespError> {
    let Some(&prefix) = input.first() else {
        return Err(MespError::Empty);
    };

    match prefix {
        b'+' => {
            let line = take_line(input)?;
            Ok(Value::Simple(lossy_text(&line[1..])))
        },
        b'-' => {
            let line = take_line(input)?;
            Ok(Value::Error(lossy_text(&line[1..])))
        },
        b':' => {
            let line = take_line(input)?;
            let v = ascii(&line[1..])?
                .trim()
                .parse::<i64>()
                .map_err(|_| MespError::BadInt)?;
            Ok(Value::Int(v))
        },
        b'#' => {
            let line = take_line(input)?;
            let v = ascii(&line[1..])?
                .trim()
                .parse::<f32>()
                .map_err(|_| MespError::BadFloat)?;
            Ok(Value::Float(v))
        },
        b'$' => parse_bulk(input),
        b'*' => parse_array(input),
        other => Err(MespError::UnknownType(other)),
    }
}

fn parse_bulk(input: &mut Bytes) -> Result<Value, MespError> {
    let line = take_line(input)?;
    let len = ascii(&line[1..])?
        .trim()
        .parse::<i64>()
        .map_err(|_| MespError::BadLength)?;

    if len == -1 {
        return Ok(Value::Bulk(Bytes::from_static(NIL)));
    }
    let len = usize::try_from(len).map_err(|_| MespError::BadLength)?;

    // Payload plus its trailing CRLF must already be buffered.
    if input.len() < len + 2 {
        return Err(MespError::ShortBulk);
    }
    let payload = input.split_to(len);
    // The two bytes after the payload are consumed without inspection.
    input.advance(2);

    Ok(Value::Bulk(payload))
}

fn parse_array(input: &mut Bytes) -> Result<Value, MespError> {
    let line = take_line(input)?;
    let count = ascii(&line[1..])?
        .trim()
        .parse::<i64>()
        .map_err(|_| MespError::BadLength)?;

    // A count of zero (or below) is an empty array. No pre-allocation from
    // the wire-supplied count; an overlong count fails on the first missing
    // element instead.
    let mut items = Vec::new();
    for _ in 0..count.max(0) {
        items.push(parse(input)?);
    }
    Ok(Value::Array(items))
}

/// Splits off everything up to the next CRLF, consuming the CRLF as well.
/// The returned line still carries the type prefix.
fn take_line(input: &mut Bytes) -> Result<Bytes, MespError> {
    let pos = input
        .windows(2)
        .position(|w| w == b"\r\n")
        .ok_or(MespError::MissingCrlf)?;
    let line = input.split_to(pos);
    input.advance(2);
    Ok(line)
}

fn ascii(raw: &[u8]) -> Result<&str, MespError> {
    std::str::from_utf8(raw).map_err(|_| MespError::BadLength)
}

/// Simple strings and errors are nominally text; undecodable bytes are
/// replaced rather than rejected so a bad client cannot wedge the parser.
fn lossy_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
