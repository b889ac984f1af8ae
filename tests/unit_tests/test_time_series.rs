// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::Bytes;
use memify_server_rs::cache::{TimePoint, TimeSeriesStore};

fn b(text: &str) -> Bytes {
    Bytes::copy_from_slice(text.as_bytes())
}

#[tokio::test]
async fn series_are_created_lazily() {
    let store = TimeSeriesStore::new(10);
    assert_eq!(store.series_count().await, 0);
    assert!(store.points(b"cpu").await.is_empty());

    store
        .add_time_point(b("cpu"), TimePoint::new("2024-05-01T00:00:00Z", 0.5))
        .await;
    assert_eq!(store.series_count().await, 1);
    assert_eq!(store.points(b"cpu").await.len(), 1);
}

#[tokio::test]
async fn appends_preserve_order() {
    let store = TimeSeriesStore::new(10);
    for i in 0..5 {
        store
            .add_time_point(b("cpu"), TimePoint::new(format!("t{i}"), i as f64))
            .await;
    }

    let points = store.points(b"cpu").await;
    let stamps: Vec<&str> = points.iter().map(|p| p.timestamp.as_str()).collect();
    assert_eq!(stamps, vec!["t0", "t1", "t2", "t3", "t4"]);
}

#[tokio::test]
async fn full_series_drops_its_oldest_sample() {
    let store = TimeSeriesStore::new(3);
    for i in 0..5 {
        store
            .add_time_point(b("cpu"), TimePoint::new(format!("t{i}"), i as f64))
            .await;
    }

    let points = store.points(b"cpu").await;
    assert_eq!(points.len(), 3);
    let stamps: Vec<&str> = points.iter().map(|p| p.timestamp.as_str()).collect();
    assert_eq!(stamps, vec!["t2", "t3", "t4"]);
}

#[tokio::test]
async fn series_are_bounded_independently() {
    let store = TimeSeriesStore::new(2);
    for i in 0..4 {
        store
            .add_time_point(b("cpu"), TimePoint::new(format!("c{i}"), 1.0))
            .await;
        store
            .add_time_point(b("mem"), TimePoint::new(format!("m{i}"), 2.0))
            .await;
    }

    assert_eq!(store.points(b"cpu").await.len(), 2);
    assert_eq!(store.points(b"mem").await.len(), 2);
    assert_eq!(store.series_count().await, 2);
}
