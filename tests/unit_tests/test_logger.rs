// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fs;

use anyhow::Result;
use memify_server_rs::cfg::logger::init_logger;
use serial_test::serial;

// The subscriber is process-global, so these tests must not interleave.

#[test]
#[serial]
fn missing_config_falls_back_and_installs_once() -> Result<()> {
    let guards = init_logger("/definitely/not/there/logger.yaml")?;
    assert!(!guards.is_empty());

    // The global subscriber can only be installed once per process.
    assert!(init_logger("/definitely/not/there/logger.yaml").is_err());
    Ok(())
}

#[test]
#[serial]
fn invalid_yaml_is_rejected_before_install() {
    let mut path = std::env::temp_dir();
    path.push(format!("memify-logger-{}.yaml", std::process::id()));
    fs::write(&path, "logger: [not, a, mapping").expect("write scratch yaml");

    let result = init_logger(path.to_string_lossy().as_ref());
    let _ = fs::remove_file(&path);
    assert!(result.is_err());
}
