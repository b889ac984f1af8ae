//! Geo cache: a composite-key point store kept in lockstep with a 3D
//! spatial index. Every stored point owns exactly one index entry tagged
//! `<collection>:<name>`; updates remove the stale entry before inserting
//! the replacement.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Unit-mixed Haversine + elevation distance.
pub mod distance;
/// The point type and its geohash cell id.
pub mod point;

use std::collections::{HashMap, VecDeque};

use bytes::Bytes;
use rstar::{AABB, RTree, RTreeObject};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub use crate::cache::geo::{distance::geo_distance, point::GeoPoint};

/// One spatial-index record: a degenerate box at the point's
/// (longitude, latitude, elevation), tagged with the composite id.
#[derive(Debug, Clone, PartialEq)]
struct SpatialEntry {
    position: [f32; 3],
    id: Bytes,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

fn composite_id(collection: &[u8], name: &[u8]) -> Bytes {
    let mut id = Vec::with_capacity(collection.len() + 1 + name.len());
    id.extend_from_slice(collection);
    id.push(b':');
    id.extend_from_slice(name);
    Bytes::from(id)
}

fn spatial_entry(collection: &[u8], point: &GeoPoint) -> SpatialEntry {
    SpatialEntry {
        position: [point.longitude, point.latitude, point.elevation],
        id: composite_id(collection, &point.name),
    }
}

struct GeoState {
    points: HashMap<(Bytes, Bytes), GeoPoint>,
    index: RTree<SpatialEntry>,
    // Insertion order of composite keys, feeding the (unwired) evict hook.
    arrival: VecDeque<(Bytes, Bytes)>,
}

/// Thread-safe store of named points grouped by collection, paired with an
/// R-tree over their 3D coordinates.
pub struct GeoCache {
    state: Mutex<GeoState>,
    max_size: usize,
}

impl GeoCache {
    /// `max_size` is carried for parity with the other engines but inserts
    /// do not evict; see [`GeoCache::evict`].
    pub fn new(max_size: usize) -> Self {
        Self {
            state: Mutex::new(GeoState {
                points: HashMap::new(),
                index: RTree::new(),
                arrival: VecDeque::new(),
            }),
            max_size,
        }
    }

    /// Inserts or replaces `(collection, point.name)`. A replacement first
    /// removes the previous spatial entry through its stored coordinates,
    /// keeping the map and the index in one-to-one correspondence.
    pub async fn set_geo_point(&self, collection: Bytes, point: GeoPoint) {
        let key = (collection.clone(), point.name.clone());
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if let Some(prev) = state.points.get(&key) {
            let stale = spatial_entry(&collection, prev);
            state.index.remove(&stale);
        } else {
            state.arrival.push_back(key.clone());
        }

        state.index.insert(spatial_entry(&collection, &point));
        info!(
            collection = %String::from_utf8_lossy(&collection),
            name = %String::from_utf8_lossy(&point.name),
            latitude = point.latitude,
            longitude = point.longitude,
            elevation = point.elevation,
            "geo point set"
        );
        state.points.insert(key, point);
    }

    /// Two-level lookup; `None` when either the collection or the name is
    /// unknown.
    pub async fn get_geo_point(&self, collection: &Bytes, name: &Bytes) -> Option<GeoPoint> {
        let key = (collection.clone(), name.clone());
        let state = self.state.lock().await;
        let found = state.points.get(&key).cloned();
        if let Some(point) = &found {
            debug!(
                collection = %String::from_utf8_lossy(collection),
                name = %String::from_utf8_lossy(name),
                latitude = point.latitude,
                longitude = point.longitude,
                "geo point found"
            );
        }
        found
    }

    /// Capacity the cache was built with. Informational until the evict
    /// hook is wired into the write path.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Number of stored points.
    pub async fn len(&self) -> usize {
        self.state.lock().await.points.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of spatial-index entries. Always equals [`GeoCache::len`];
    /// exposed so the coupling invariant can be observed.
    pub async fn spatial_entry_count(&self) -> usize {
        self.state.lock().await.index.size()
    }

    /// Drops the oldest inserted point and its spatial entry. Present as a
    /// hook only: no write path calls it today, so the geo cache does not
    /// actually enforce `max_size`.
    pub async fn evict(&self) -> Option<(Bytes, Bytes)> {
        let mut state = self.state.lock().await;
        let key = state.arrival.pop_front()?;
        if let Some(prev) = state.points.remove(&key) {
            let stale = spatial_entry(&key.0, &prev);
            state.index.remove(&stale);
            info!(
                collection = %String::from_utf8_lossy(&key.0),
                name = %String::from_utf8_lossy(&key.1),
                "evicted geo point"
            );
        }
        Some(key)
    }
}
