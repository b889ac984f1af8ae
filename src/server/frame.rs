// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Width of the big-endian length prefix in front of every frame.
pub const LEN_PREFIX: usize = 4;

/// Upper bound on a single socket read, and on the handshake message.
pub const READ_CHUNK: usize = 1024;

/// One step of the receive-buffer drain.
///
/// `expected == 0` means "awaiting a length prefix". Returns the next
/// complete frame once the buffer holds it, leaving `expected` reset;
/// returns `None` (with `expected` possibly primed) when more bytes are
/// needed. A zero-length prefix yields an empty frame, which downstream
/// rejects as a malformed message.
pub fn next_frame(buf: &mut BytesMut, expected: &mut usize) -> Option<Bytes> {
    if *expected == 0 {
        if buf.len() < LEN_PREFIX {
            return None;
        }
        *expected = buf.get_u32() as usize;
    }
    if buf.len() < *expected {
        return None;
    }
    let frame = buf.split_to(*expected).freeze();
    *expected = 0;
    Some(frame)
}

/// Length-prefixes a response payload.
pub fn encode_frame(payload: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(LEN_PREFIX + payload.len());
    out.put_u32(payload.len() as u32);
    out.put_slice(payload);
    out.freeze()
}

/// Splits a request frame into `(hex signature, mesp payload)` at the first
/// newline. `None` when the delimiter is missing.
pub fn split_signed(frame: &Bytes) -> Option<(Bytes, Bytes)> {
    let pos = frame.iter().position(|&b| b == b'\n')?;
    Some((frame.slice(..pos), frame.slice(pos + 1..)))
}
