//! Command dispatch: a parsed MESP value comes in, a MESP reply goes out.
//! A bare SimpleString is a ping; everything else must be an Array whose
//! first element is a BulkString verb. Engines are injected at construction.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// The fixed wire error replies.
pub mod errors;
/// GEOSET / GEOGET / GEODISTANCE.
pub mod geo;
/// SET / GET / DELETE.
pub mod strings;
/// TSADD.
pub mod time_series;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::{
    cache::{GeoCache, StringCache, TimeSeriesStore},
    mesp::Value,
};

/// Routes requests to the engines. One instance is shared by every
/// connection through an `Arc`.
pub struct Dispatcher {
    cache: Arc<StringCache>,
    geo_cache: Arc<GeoCache>,
    time_series: Arc<TimeSeriesStore>,
}

impl Dispatcher {
    pub fn new(
        cache: Arc<StringCache>,
        geo_cache: Arc<GeoCache>,
        time_series: Arc<TimeSeriesStore>,
    ) -> Self {
        Self {
            cache,
            geo_cache,
            time_series,
        }
    }

    /// Handles one request. Shape and type problems come back as the fixed
    /// error replies; an `Err` here is reserved for internal failures and is
    /// rendered by the connection layer as `ERROR: <detail>`.
    pub async fn dispatch(&self, request: Value) -> Result<Value> {
        match request {
            Value::Simple(_) => Ok(Value::bulk_str("PONG")),
            Value::Array(items) => Ok(self.dispatch_array(&items).await),
            _ => Ok(errors::invalid_mesp_type()),
        }
    }

    async fn dispatch_array(&self, items: &[Value]) -> Value {
        let Some(first) = items.first() else {
            return errors::invalid_command_format();
        };
        let Some(verb) = first.as_verb() else {
            return errors::invalid_command_format();
        };
        debug!(verb, arity = items.len(), "dispatching command");

        match verb {
            "SET" => strings::handle_set(&self.cache, items).await,
            "GET" => strings::handle_get(&self.cache, items).await,
            "DELETE" => strings::handle_delete(&self.cache, items).await,
            "GEOSET" => geo::handle_geo_set(&self.geo_cache, items).await,
            "GEOGET" => geo::handle_geo_get(&self.geo_cache, items).await,
            "GEODISTANCE" => geo::handle_geo_distance(&self.geo_cache, items).await,
            "TSADD" => time_series::handle_ts_add(&self.time_series, items).await,
            _ => errors::invalid_command(),
        }
    }
}
