// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex HMAC-SHA256 of `payload` under `secret`. This is what a
/// well-behaved client puts in front of every frame and in the handshake.
pub fn sign_hex(payload: &[u8], secret: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        // HMAC accepts keys of any length; keep the signature infallible.
        Err(_) => return String::new(),
    };
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies `hex_signature` against HMAC-SHA256(secret, payload).
///
/// The expected signature is lowercase hex; the comparison checks byte
/// length first and then compares in constant time, so a mismatch leaks
/// nothing about the secret. Any internal failure verifies as false.
pub fn verify(payload: &[u8], hex_signature: &str, secret: &[u8]) -> bool {
    let expected = sign_hex(payload, secret);
    if expected.is_empty() {
        return false;
    }
    expected
        .as_bytes()
        .ct_eq(hex_signature.as_bytes())
        .into()
}
