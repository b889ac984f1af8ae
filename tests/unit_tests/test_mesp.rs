// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::Bytes;
use memify_server_rs::mesp::{MespError, Value, parse, serialize};

fn parse_all(raw: &[u8]) -> Result<Value, MespError> {
    let mut input = Bytes::copy_from_slice(raw);
    parse(&mut input)
}

#[test]
fn parses_simple_string() {
    assert_eq!(parse_all(b"+OK\r\n"), Ok(Value::Simple("OK".to_string())));
}

#[test]
fn parses_error() {
    assert_eq!(
        parse_all(b"-boom\r\n"),
        Ok(Value::Error("boom".to_string()))
    );
}

#[test]
fn parses_integer_and_float() {
    assert_eq!(parse_all(b":-42\r\n"), Ok(Value::Int(-42)));
    assert_eq!(parse_all(b"#2.5\r\n"), Ok(Value::Float(2.5)));
}

#[test]
fn parses_bulk_string_with_binary_payload() {
    assert_eq!(
        parse_all(b"$5\r\na\x00b\xffc\r\n"),
        Ok(Value::bulk(&b"a\x00b\xffc"[..]))
    );
}

#[test]
fn parses_set_command_array() {
    // The wire form of `SET k v`.
    let raw = b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n";
    assert_eq!(
        parse_all(raw),
        Ok(Value::Array(vec![
            Value::bulk_str("SET"),
            Value::bulk_str("k"),
            Value::bulk_str("v"),
        ]))
    );
}

#[test]
fn nil_bulk_round_trips_through_sentinel() {
    assert_eq!(parse_all(b"$-1\r\n"), Ok(Value::nil()));
    assert_eq!(serialize(&Value::nil()).as_ref(), b"$-1\r\n");
}

#[test]
fn consumes_exactly_one_value() {
    let mut input = Bytes::from_static(b":1\r\n:2\r\n");
    assert_eq!(parse(&mut input), Ok(Value::Int(1)));
    assert_eq!(input.as_ref(), b":2\r\n");
    assert_eq!(parse(&mut input), Ok(Value::Int(2)));
    assert!(input.is_empty());
}

#[test]
fn rejects_missing_crlf() {
    assert_eq!(parse_all(b"+PING"), Err(MespError::MissingCrlf));
    assert_eq!(parse_all(b":17"), Err(MespError::MissingCrlf));
}

#[test]
fn rejects_short_bulk() {
    assert_eq!(parse_all(b"$10\r\nabc\r\n"), Err(MespError::ShortBulk));
}

#[test]
fn rejects_unknown_prefix_and_empty_input() {
    assert_eq!(parse_all(b"?huh\r\n"), Err(MespError::UnknownType(b'?')));
    assert_eq!(parse_all(b""), Err(MespError::Empty));
}

#[test]
fn rejects_bad_numbers() {
    assert_eq!(parse_all(b":abc\r\n"), Err(MespError::BadInt));
    assert_eq!(parse_all(b"#abc\r\n"), Err(MespError::BadFloat));
    assert_eq!(parse_all(b"$x\r\n"), Err(MespError::BadLength));
}

#[test]
fn negative_array_count_is_empty() {
    assert_eq!(parse_all(b"*-1\r\n"), Ok(Value::Array(vec![])));
    assert_eq!(parse_all(b"*0\r\n"), Ok(Value::Array(vec![])));
}

#[test]
fn round_trips_every_type() {
    let values = [
        Value::Simple("PING".to_string()),
        Value::Error("ERR something".to_string()),
        Value::Int(i64::MIN),
        Value::Int(0),
        Value::Float(-12.75),
        Value::bulk_str(""),
        Value::bulk_str("hello world"),
        Value::nil(),
        Value::Array(vec![
            Value::bulk_str("GEOSET"),
            Value::bulk_str("city"),
            Value::bulk_str("Paris"),
            Value::Float(48.8566),
            Value::Float(2.3522),
            Value::Float(35.0),
        ]),
        Value::Array(vec![Value::Array(vec![Value::Int(1)]), Value::Simple("x".into())]),
    ];

    for value in values {
        let wire = serialize(&value);
        let mut input = wire.clone();
        let back = parse(&mut input).expect("round trip parse failed");
        assert_eq!(back, value, "round trip mismatch for {wire:?}");
        assert!(input.is_empty(), "serializer left trailing bytes");
    }
}

#[test]
fn serializes_known_forms() {
    assert_eq!(serialize(&Value::Simple("OK".into())).as_ref(), b"+OK\r\n");
    assert_eq!(serialize(&Value::Int(7)).as_ref(), b":7\r\n");
    assert_eq!(serialize(&Value::Float(1.5)).as_ref(), b"#1.5\r\n");
    assert_eq!(
        serialize(&Value::bulk_str("PONG")).as_ref(),
        b"$4\r\nPONG\r\n"
    );
    assert_eq!(
        serialize(&Value::Array(vec![Value::Int(1), Value::Int(2)])).as_ref(),
        b"*2\r\n:1\r\n:2\r\n"
    );
}
