// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::{BufMut, Bytes, BytesMut};

use crate::mesp::value::{NIL, Value};

/// Serializes a value into its wire bytes.
///
/// Round-trip holds for every well-typed value: `parse(serialize(x)) == x`,
/// with the nil BulkString travelling through the `"nil"` sentinel.
pub fn serialize(value: &Value) -> Bytes {
    let mut out = BytesMut::new();
    write_value(&mut out, value);
    out.freeze()
}

fn write_value(out: &mut BytesMut, value: &Value) {
    match value {
        Value::Simple(s) => {
            out.put_u8(b'+');
            out.put_slice(s.as_bytes());
            out.put_slice(b"\r\n");
        },
        Value::Error(e) => {
            out.put_u8(b'-');
            out.put_slice(e.as_bytes());
            out.put_slice(b"\r\n");
        },
        Value::Int(v) => {
            out.put_slice(format!(":{v}\r\n").as_bytes());
        },
        Value::Float(v) => {
            out.put_slice(format!("#{v}\r\n").as_bytes());
        },
        Value::Bulk(payload) => {
            if payload.as_ref() == NIL {
                out.put_slice(b"$-1\r\n");
            } else {
                out.put_slice(format!("${}\r\n", payload.len()).as_bytes());
                out.put_slice(payload);
                out.put_slice(b"\r\n");
            }
        },
        Value::Array(items) => {
            out.put_slice(format!("*{}\r\n", items.len()).as_bytes());
            for item in items {
                write_value(out, item);
            }
        },
    }
}
