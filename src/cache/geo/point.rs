// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::Bytes;
use geohash::Coord;

/// Geohash precision (base32 symbols) used for every stored point.
pub const GEOHASH_PRECISION: usize = 12;

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// A named point in a collection. Immutable once constructed; the geohash
/// cell id is derived from (latitude, longitude) at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub name: Bytes,
    pub latitude: f32,
    pub longitude: f32,
    pub elevation: f32,
    pub geo_hash: u64,
}

impl GeoPoint {
    pub fn new(name: Bytes, latitude: f32, longitude: f32, elevation: f32) -> Self {
        let geo_hash = cell_id(latitude, longitude);
        Self {
            name,
            latitude,
            longitude,
            elevation,
            geo_hash,
        }
    }
}

/// Encodes (lat, lon) into a 64-bit cell id: the precision-12 geohash packed
/// five bits per symbol. Out-of-range coordinates hash to 0.
fn cell_id(latitude: f32, longitude: f32) -> u64 {
    let coord = Coord {
        x: f64::from(longitude),
        y: f64::from(latitude),
    };
    match geohash::encode(coord, GEOHASH_PRECISION) {
        Ok(hash) => pack_base32(&hash),
        Err(_) => 0,
    }
}

fn pack_base32(hash: &str) -> u64 {
    hash.bytes().fold(0u64, |acc, symbol| {
        let idx = BASE32
            .iter()
            .position(|&b| b == symbol)
            .unwrap_or_default() as u64;
        (acc << 5) | idx
    })
}
