// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use crate::{
    cache::StringCache,
    handlers::errors,
    mesp::Value,
};

/// `SET key value [ttl]`: stores the pair and echoes `[key, value, ttl]`.
///
/// The TTL slot is honored only at arity four and must be an Integer; extra
/// trailing elements are tolerated and mean a zero TTL. A zero (or negative)
/// TTL stores an entry that is already expired.
pub async fn handle_set(cache: &StringCache, items: &[Value]) -> Value {
    if items.len() < 3 {
        return errors::invalid_command_format();
    }

    let (Some(key), Some(value)) = (items[1].as_bulk(), items[2].as_bulk()) else {
        return errors::invalid_command_format();
    };

    let mut ttl_secs: i64 = 0;
    if items.len() == 4 {
        match items[3].as_int() {
            Some(secs) => ttl_secs = secs,
            None => return errors::invalid_duration_format(),
        }
    }

    let ttl = Duration::from_secs(ttl_secs.max(0) as u64);
    cache.set(key.clone(), value.clone(), ttl).await;

    Value::Array(vec![
        Value::Bulk(key.clone()),
        Value::Bulk(value.clone()),
        Value::Int(ttl_secs),
    ])
}

/// `GET key`: the stored value, or `NOT FOUND`.
pub async fn handle_get(cache: &StringCache, items: &[Value]) -> Value {
    if items.len() != 2 {
        return errors::invalid_command_format();
    }
    let Some(key) = items[1].as_bulk() else {
        return errors::invalid_command_format();
    };

    match cache.get(key).await {
        Some(value) => Value::Bulk(value),
        None => errors::not_found(),
    }
}

/// `DELETE key`: `SUCCESS` when the key was live, `NOT FOUND` otherwise.
/// Existence is probed through `get`, so a delete of a live key also counts
/// as a recency touch before the removal.
pub async fn handle_delete(cache: &StringCache, items: &[Value]) -> Value {
    if items.len() != 2 {
        return errors::invalid_command_format();
    }
    let Some(key) = items[1].as_bulk() else {
        return errors::invalid_command_format();
    };

    if cache.get(key).await.is_some() {
        cache.delete(key).await;
        Value::bulk_str("SUCCESS")
    } else {
        errors::not_found()
    }
}
