// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::collections::HashMap;

use bytes::Bytes;
use tokio::sync::Mutex;
use tracing::debug;

/// One sample: an opaque timestamp string (ISO-8601 by convention, never
/// interpreted) and a value.
#[derive(Debug, Clone, PartialEq)]
pub struct TimePoint {
    pub timestamp: String,
    pub value: f64,
}

impl TimePoint {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// Append-only store of bounded per-series sample logs. Series are created
/// lazily on first append; a full series drops its oldest sample to make
/// room, preserving append order.
pub struct TimeSeriesStore {
    state: Mutex<HashMap<Bytes, Vec<TimePoint>>>,
    max_points: usize,
}

impl TimeSeriesStore {
    pub fn new(max_points: usize) -> Self {
        Self {
            state: Mutex::new(HashMap::new()),
            max_points,
        }
    }

    /// Appends `point` to `series`, dropping the oldest sample first when
    /// the series is at capacity.
    pub async fn add_time_point(&self, series: Bytes, point: TimePoint) {
        let mut state = self.state.lock().await;
        let samples = state.entry(series.clone()).or_default();
        if samples.len() >= self.max_points {
            samples.remove(0);
        }
        debug!(
            series = %String::from_utf8_lossy(&series),
            timestamp = %point.timestamp,
            value = point.value,
            "time point added"
        );
        samples.push(point);
    }

    /// Samples of a series in append order. Not part of the wire surface;
    /// kept for diagnostics and tests.
    pub async fn points(&self, series: &[u8]) -> Vec<TimePoint> {
        let state = self.state.lock().await;
        state.get(series).cloned().unwrap_or_default()
    }

    /// Number of series with at least one sample.
    pub async fn series_count(&self) -> usize {
        self.state.lock().await.len()
    }
}
