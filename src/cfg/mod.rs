//! This module handles configuration, path resolution, and logging.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Config-path resolution helpers.
pub mod cli;
/// Server settings (`config.ini`).
pub mod config;
/// Logger initialization.
pub mod logger;
