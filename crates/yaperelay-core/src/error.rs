// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the yaperelay pipeline and its collaborators.

use thiserror::Error;

/// The primary error type used across yaperelay's collaborator traits
/// and the event pipeline.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Message delivery errors (transport failure, invalid destination).
    ///
    /// The pipeline treats these as non-fatal: a delivery error downgrades
    /// the event's `forwarded` flag but never aborts persistence.
    #[error("send error: {message}")]
    Send {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
