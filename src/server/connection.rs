// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    net::SocketAddr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use bytes::{Bytes, BytesMut};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};
use tracing::{debug, info, warn};

use crate::{
    handlers::Dispatcher,
    mesp::{self, Value},
    security,
    server::frame::{self, READ_CHUNK},
};

/// Maximum clock skew tolerated in the handshake, either direction.
const MAX_SKEW_SECS: i64 = 5 * 60;

/// One authenticated client session.
///
/// The first message on the socket is the unframed handshake
/// `<unix-seconds>|<hex-signature>`; after an `OK\n` the connection speaks
/// length-prefixed signed frames until the peer goes away. The handshake
/// carries no nonce, so a captured message can be replayed inside the skew
/// window; deploy accordingly.
pub struct ClientConnection {
    stream: TcpStream,
    peer: SocketAddr,
    secret: Arc<str>,
    dispatcher: Arc<Dispatcher>,
    buf: BytesMut,
    expected_len: usize,
    authenticated: bool,
}

impl ClientConnection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        secret: Arc<str>,
        dispatcher: Arc<Dispatcher>,
    ) -> Self {
        Self {
            stream,
            peer,
            secret,
            dispatcher,
            buf: BytesMut::with_capacity(READ_CHUNK),
            expected_len: 0,
            authenticated: false,
        }
    }

    /// Runs the handshake and then the request loop. Returns when the peer
    /// closes or a socket error occurs; the socket is dropped on every path.
    pub async fn run(mut self) -> Result<()> {
        if !self.authenticate().await? {
            info!(peer = %self.peer, "authentication failed, closing");
            return Ok(());
        }
        info!(peer = %self.peer, "client authenticated");
        self.serve().await
    }

    /// Single-read challenge check: timestamp freshness plus an HMAC over
    /// the timestamp string. Every rejection answers `FAIL\n`; success
    /// answers `OK\n`.
    async fn authenticate(&mut self) -> Result<bool> {
        let mut chunk = [0u8; READ_CHUNK];
        let n = self
            .stream
            .read(&mut chunk)
            .await
            .context("handshake read failed")?;
        if n == 0 {
            // Peer connected and went away; nothing to answer.
            return Ok(false);
        }

        let raw = String::from_utf8_lossy(&chunk[..n]);
        let message = raw.trim_end_matches(['\r', '\n', '\0', ' ']);

        let Some((timestamp, sent_signature)) = message.split_once('|') else {
            return self.reject_handshake("missing delimiter").await;
        };

        let Ok(sent_at) = timestamp.parse::<i64>() else {
            return self.reject_handshake("unparsable timestamp").await;
        };
        let now = unix_now_secs();
        if (now - sent_at).abs() > MAX_SKEW_SECS {
            return self.reject_handshake("timestamp outside skew window").await;
        }

        if !security::verify(timestamp.as_bytes(), sent_signature, self.secret.as_bytes())
        {
            return self.reject_handshake("bad signature").await;
        }

        self.stream.write_all(b"OK\n").await?;
        self.authenticated = true;
        Ok(true)
    }

    async fn reject_handshake(&mut self, reason: &str) -> Result<bool> {
        debug!(peer = %self.peer, reason, "handshake rejected");
        self.stream.write_all(b"FAIL\n").await?;
        Ok(false)
    }

    /// The request loop: read a chunk, drain every complete frame, repeat.
    /// Per-command failures answer in-band and never end the session.
    async fn serve(&mut self) -> Result<()> {
        debug_assert!(self.authenticated);
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = match self.stream.read(&mut chunk).await {
                Ok(0) => {
                    info!(peer = %self.peer, "client disconnected");
                    return Ok(());
                },
                Ok(n) => n,
                Err(e) => {
                    warn!(peer = %self.peer, "recv failed: {e}");
                    return Err(e.into());
                },
            };
            self.buf.extend_from_slice(&chunk[..n]);
            self.drain().await?;
        }
    }

    async fn drain(&mut self) -> Result<()> {
        while let Some(request) = frame::next_frame(&mut self.buf, &mut self.expected_len)
        {
            let reply = self.process_frame(request).await;
            self.send_response(&reply).await?;
        }
        Ok(())
    }

    /// Verifies and dispatches one frame, producing the serialized reply.
    async fn process_frame(&self, request: Bytes) -> Bytes {
        let Some((signature, payload)) = frame::split_signed(&request) else {
            warn!(peer = %self.peer, "invalid message format");
            return mesp::serialize(&Value::bulk_str("Invalid message format"));
        };

        let signature = String::from_utf8_lossy(&signature);
        if !security::verify(&payload, &signature, self.secret.as_bytes()) {
            warn!(peer = %self.peer, "signature verification failure");
            return mesp::serialize(&Value::bulk_str("Signature Verification Failure"));
        }

        let mut cursor = payload;
        let reply = match mesp::parse(&mut cursor) {
            Ok(request) => match self.dispatcher.dispatch(request).await {
                Ok(reply) => reply,
                Err(e) => Value::bulk_str(&format!("ERROR: {e}")),
            },
            Err(e) => Value::bulk_str(&format!("ERROR: {e}")),
        };
        mesp::serialize(&reply)
    }

    async fn send_response(&mut self, payload: &[u8]) -> Result<()> {
        let framed = frame::encode_frame(payload);
        self.stream
            .write_all(&framed)
            .await
            .context("send failed")?;
        Ok(())
    }
}

fn unix_now_secs() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(_) => 0,
    }
}
