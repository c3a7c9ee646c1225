// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects all errors instead of failing fast.

use crate::diagnostic::ConfigError;
use crate::model::RelayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with every collected validation error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.relay.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "relay.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.relay.log_level
            ),
        });
    }

    if config.relay.keywords.is_empty() {
        errors.push(ConfigError::Validation {
            message: "relay.keywords must not be empty".to_string(),
        });
    }

    for (i, keyword) in config.relay.keywords.iter().enumerate() {
        if keyword.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("relay.keywords[{i}] must not be blank"),
            });
        }
    }

    if config.relay.recent_limit < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "relay.recent_limit must be at least 1, got {}",
                config.relay.recent_limit
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
