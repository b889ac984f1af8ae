// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::Path;

use anyhow::{Context, Result, ensure};
use config::{Config, File, FileFormat};
use serde::Deserialize;

/// Port the server listens on when `config.ini` does not say otherwise.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared secret fallback. Real deployments must override this in
/// `config.ini`; it exists so a bare checkout still boots.
pub const DEFAULT_SECRET_KEY: &str = "xyz";

/// Conventional location of the settings file, relative to the working
/// directory of the server binary.
pub const DEFAULT_CONFIG_PATH: &str = "../config.ini";

/// Server settings, read from the `[settings]` section of `config.ini`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// TCP port to listen on.
    pub port: u16,
    /// Shared HMAC secret for the handshake and for frame signatures.
    pub secret_key: String,
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    settings: Settings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from an INI file, falling back to the defaults for a
    /// missing file or missing keys, and validates the result. A present but
    /// unreadable file is an error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let layered = Config::builder()
            .set_default("settings.port", i64::from(DEFAULT_PORT))?
            .set_default("settings.secret_key", DEFAULT_SECRET_KEY)?
            .add_source(
                File::from(path)
                    .format(FileFormat::Ini)
                    .required(false),
            )
            .build()
            .with_context(|| format!("failed to read settings from {path:?}"))?;

        let cfg: SettingsFile = layered
            .try_deserialize()
            .with_context(|| format!("failed to parse settings from {path:?}"))?;

        let settings = cfg.settings;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates invariants the rest of the server relies on.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.secret_key.is_empty(),
            "secret_key must not be empty"
        );
        Ok(())
    }
}
