//! MESP (Memify Serialization Protocol), a RESP dialect with an added
//! Float type (`#` prefix). Values are parsed out of a complete frame and
//! serialized back byte-for-byte; see [`parse`] and [`serialize`].

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Destructive frame parser.
pub mod parse;
/// Wire serialization.
pub mod serialize;
/// The value model for the six wire types.
pub mod value;

pub use parse::{MespError, parse};
pub use serialize::serialize;
pub use value::Value;
