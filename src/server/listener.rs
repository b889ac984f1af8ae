// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use tokio::{net::TcpListener, select};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    cache::{GeoCache, StringCache, TimeSeriesStore},
    cfg::config::Settings,
    handlers::Dispatcher,
    server::connection::ClientConnection,
};

/// The accept loop. Binding is separated from running so callers (and
/// tests) can bind port 0 and learn the real address before serving.
pub struct Server {
    listener: TcpListener,
    secret: Arc<str>,
    dispatcher: Arc<Dispatcher>,
    cancel: CancellationToken,
}

impl Server {
    /// Binds the listening socket and wires the engines into a shared
    /// dispatcher. Bind failure is the one process-fatal error.
    pub async fn bind(
        settings: &Settings,
        cache: Arc<StringCache>,
        geo_cache: Arc<GeoCache>,
        time_series: Arc<TimeSeriesStore>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", settings.port))
            .await
            .with_context(|| format!("failed to bind port {}", settings.port))?;

        Ok(Self {
            listener,
            secret: Arc::from(settings.secret_key.as_str()),
            dispatcher: Arc::new(Dispatcher::new(cache, geo_cache, time_series)),
            cancel,
        })
    }

    /// The address actually bound, useful when the configured port is 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts until cancelled. Each accepted socket gets its own task, so
    /// a slow client never blocks another's progress. Accept errors are
    /// logged and the loop keeps going.
    pub async fn run(&self) -> Result<()> {
        if let Ok(addr) = self.local_addr() {
            info!(%addr, "memify is listening");
        }

        loop {
            select! {
                _ = self.cancel.cancelled() => {
                    info!("accept loop stopped");
                    return Ok(());
                },
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            warn!("accept failed: {e}");
                            continue;
                        },
                    };
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(%peer, "set_nodelay failed: {e}");
                    }
                    info!(%peer, "client attempting to connect");

                    let conn = ClientConnection::new(
                        stream,
                        peer,
                        Arc::clone(&self.secret),
                        Arc::clone(&self.dispatcher),
                    );
                    tokio::spawn(async move {
                        if let Err(e) = conn.run().await {
                            warn!(%peer, "connection closed with error: {e}");
                        }
                    });
                },
            }
        }
    }
}
