// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for yaperelay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! This is *startup* configuration only. The watched-package list,
//! destination contacts, and the enable/capture-all flags are runtime
//! settings owned by the settings store, not by this file.

use serde::{Deserialize, Serialize};

/// Top-level yaperelay configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Pipeline behavior settings.
    #[serde(default)]
    pub relay: RelaySection,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Pipeline behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Keyword substrings that mark a notification text as a payment
    /// event when no amount pattern is found. Matched case-insensitively.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// How many events the "recent" history view returns.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: i64,
}

impl Default for RelaySection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            keywords: default_keywords(),
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_keywords() -> Vec<String> {
    [
        "te yapearon",
        "te han yapeado",
        "recibiste un yape",
        "recibiste dinero",
        "yape",
    ]
    .map(String::from)
    .to_vec()
}

fn default_recent_limit() -> i64 {
    10
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("yaperelay").join("yaperelay.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "yaperelay.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}
