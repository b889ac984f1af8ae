// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    cache::{TimePoint, TimeSeriesStore},
    handlers::errors,
    mesp::Value,
};

/// `TSADD series timestamp value`: appends one sample and echoes
/// `[series, timestamp, value]`. The timestamp is an opaque string; the
/// value must be a Float. Write-only: there is no read verb for series.
pub async fn handle_ts_add(store: &TimeSeriesStore, items: &[Value]) -> Value {
    if items.len() != 4 {
        return errors::invalid_command_format();
    }

    let (Some(series), Some(timestamp)) = (items[1].as_bulk(), items[2].as_bulk())
    else {
        return errors::invalid_command_format();
    };
    let Some(value) = items[3].as_float() else {
        return errors::invalid_command_format();
    };

    let timestamp_text = String::from_utf8_lossy(timestamp).into_owned();
    store
        .add_time_point(
            series.clone(),
            TimePoint::new(timestamp_text, f64::from(value)),
        )
        .await;

    Value::Array(vec![
        Value::Bulk(series.clone()),
        Value::Bulk(timestamp.clone()),
        Value::Float(value),
    ])
}
