// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./yaperelay.toml` > `~/.config/yaperelay/yaperelay.toml`
//! > `/etc/yaperelay/yaperelay.toml` with environment variable overrides via
//! `YAPERELAY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RelayConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/yaperelay/yaperelay.toml` (system-wide)
/// 3. `~/.config/yaperelay/yaperelay.toml` (user XDG config)
/// 4. `./yaperelay.toml` (local directory)
/// 5. `YAPERELAY_*` environment variables
pub fn load_config() -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::file("/etc/yaperelay/yaperelay.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("yaperelay/yaperelay.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("yaperelay.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RelayConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `YAPERELAY_STORAGE_DATABASE_PATH` must
/// map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("YAPERELAY_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: YAPERELAY_RELAY_LOG_LEVEL -> "relay_log_level"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("relay_", "relay.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
