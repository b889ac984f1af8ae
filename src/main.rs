// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::sync::Arc;

use anyhow::{Context, Result};
use memify_server_rs::{
    cache::{GeoCache, StringCache, TimeSeriesStore},
    cfg::{cli::settings_path, config::Settings, logger::init_logger},
    server::Server,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Default capacity of each engine, matching the reference deployment.
const ENGINE_CAPACITY: usize = 1000;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guards = init_logger("config/logger.yaml")?;

    // A checkout without a config.ini boots on the defaults.
    let settings =
        Settings::load_from_file(settings_path()).context("failed to load settings")?;

    // The engines are shared by every connection for the process lifetime.
    let cache = StringCache::new(ENGINE_CAPACITY);
    let geo_cache = Arc::new(GeoCache::new(ENGINE_CAPACITY));
    let time_series = Arc::new(TimeSeriesStore::new(ENGINE_CAPACITY));

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            ctrl_c_cancel.cancel();
        }
    });

    let server = Server::bind(
        &settings,
        Arc::clone(&cache),
        geo_cache,
        time_series,
        cancel,
    )
    .await
    .context("failed to start listener")?;

    server.run().await?;

    // Join the cache sweeper so no background task outlives the server.
    cache.shutdown().await;
    info!("server stopped");

    Ok(())
}
