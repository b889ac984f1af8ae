// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    cache::{GeoCache, GeoPoint, geo_distance},
    handlers::errors,
    mesp::Value,
};

fn point_reply(point: &GeoPoint) -> Value {
    Value::Array(vec![
        Value::Bulk(point.name.clone()),
        Value::Float(point.latitude),
        Value::Float(point.longitude),
        Value::Float(point.elevation),
    ])
}

/// `GEOSET collection name lat lon [elev]`: stores the point and echoes
/// `[name, lat, lon, elev]`. Coordinates must be Floats; a missing elevation
/// defaults to zero.
pub async fn handle_geo_set(cache: &GeoCache, items: &[Value]) -> Value {
    if !(5..=6).contains(&items.len()) {
        return errors::invalid_command_format();
    }

    let (Some(collection), Some(name)) = (items[1].as_bulk(), items[2].as_bulk()) else {
        return errors::invalid_command_format();
    };

    let (Some(latitude), Some(longitude)) = (items[3].as_float(), items[4].as_float())
    else {
        return errors::invalid_geo_point_format();
    };
    let elevation = match items.get(5) {
        Some(slot) => match slot.as_float() {
            Some(elev) => elev,
            None => return errors::invalid_geo_point_format(),
        },
        None => 0.0,
    };

    let point = GeoPoint::new(name.clone(), latitude, longitude, elevation);
    let reply = point_reply(&point);
    cache.set_geo_point(collection.clone(), point).await;
    reply
}

/// `GEOGET collection name`: `[name, lat, lon, elev]` or a not-found reply.
pub async fn handle_geo_get(cache: &GeoCache, items: &[Value]) -> Value {
    if items.len() != 3 {
        return errors::invalid_command_format();
    }
    let (Some(collection), Some(name)) = (items[1].as_bulk(), items[2].as_bulk()) else {
        return errors::invalid_command_format();
    };

    match cache.get_geo_point(collection, name).await {
        Some(point) => point_reply(&point),
        None => errors::location_not_found(),
    }
}

/// `GEODISTANCE collection name1 name2`: the combined surface/elevation
/// distance between two stored points as a Float, or a not-found reply when
/// either point is missing.
pub async fn handle_geo_distance(cache: &GeoCache, items: &[Value]) -> Value {
    if items.len() != 4 {
        return errors::invalid_command_format();
    }
    let (Some(collection), Some(first), Some(second)) =
        (items[1].as_bulk(), items[2].as_bulk(), items[3].as_bulk())
    else {
        return errors::invalid_command_format();
    };

    let a = cache.get_geo_point(collection, first).await;
    let b = cache.get_geo_point(collection, second).await;
    match (a, b) {
        (Some(a), Some(b)) => Value::Float(geo_distance(&a, &b) as f32),
        _ => errors::location_not_found(),
    }
}
