// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::f64::consts::PI;

use crate::cache::geo::point::GeoPoint;

/// Earth radius in kilometers, as used by the surface term.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance combined with the elevation delta.
///
/// The surface term is in kilometers while the elevation delta stays in the
/// points' native units; the two are combined under one hypotenuse without
/// conversion, so the result is a unit-mixed scalar. The exact operation
/// order (manual degree conversion, plain `sqrt` of the squared sum) is part
/// of the compatibility contract: clients on other runtimes compute the
/// identical bits.
pub fn geo_distance(point1: &GeoPoint, point2: &GeoPoint) -> f64 {
    let lat1 = f64::from(point1.latitude) * PI / 180.0;
    let lon1 = f64::from(point1.longitude) * PI / 180.0;
    let lat2 = f64::from(point2.latitude) * PI / 180.0;
    let lon2 = f64::from(point2.longitude) * PI / 180.0;

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin() * (dlat / 2.0).sin()
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin() * (dlon / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    let surface_distance = EARTH_RADIUS_KM * c;

    let elevation_diff = f64::from(point2.elevation) - f64::from(point1.elevation);
    (surface_distance * surface_distance + elevation_diff * elevation_diff).sqrt()
}
