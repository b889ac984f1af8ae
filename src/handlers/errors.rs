// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::mesp::Value;

// Every dispatch-level failure travels as a BulkString with one of these
// fixed payloads; clients match on them verbatim.

pub fn invalid_command() -> Value {
    Value::bulk_str("INVALID COMMAND: Invalid command")
}

pub fn invalid_command_format() -> Value {
    Value::bulk_str("INVALID COMMAND: Invalid command format")
}

pub fn invalid_mesp_type() -> Value {
    Value::bulk_str("INVALID COMMAND: Invalid MESP type")
}

pub fn invalid_geo_point_format() -> Value {
    Value::bulk_str("INVALID COMMAND: Invalid geopoint format")
}

pub fn invalid_duration_format() -> Value {
    Value::bulk_str("INVALID DURATION FORMAT")
}

pub fn not_found() -> Value {
    Value::bulk_str("NOT FOUND")
}

pub fn location_not_found() -> Value {
    Value::bulk_str("NOT FOUND: Location not found in Cache")
}
