// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cfg::config::DEFAULT_CONFIG_PATH;

/// Environment variable that overrides the `config.ini` location. The
/// server takes no command-line flags, so this is the only runtime knob.
pub const CONFIG_PATH_ENV: &str = "MEMIFY_CONFIG";

/// Resolves a possibly relative path against the current working directory
/// and canonicalizes it. Fails when the target does not exist.
pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}

/// Where to read the server settings from: `$MEMIFY_CONFIG` when set,
/// otherwise the conventional `../config.ini`. A location that does not
/// exist is returned as-is; the settings loader treats it as "use the
/// defaults".
pub fn settings_path() -> PathBuf {
    let configured =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    match resolve_config_path(&configured) {
        Ok(path) => path,
        Err(_) => {
            debug!(path = %configured, "settings file not found, using defaults");
            PathBuf::from(configured)
        },
    }
}
