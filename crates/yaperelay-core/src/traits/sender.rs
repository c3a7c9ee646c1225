// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message sender trait: SMS-equivalent delivery to one destination.

use async_trait::async_trait;

use crate::error::RelayError;

/// Outbound message delivery.
///
/// Implementations may split long text into multiple parts transparently.
/// A send failure is non-fatal to the caller: the pipeline records it by
/// downgrading the event's `forwarded` flag.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Whether sending is currently possible (the send-permission analog).
    /// When false the pipeline skips delivery without treating it as an
    /// error.
    fn is_available(&self) -> bool;

    /// Delivers `text` to `number`.
    async fn send(&self, number: &str, text: &str) -> Result<(), RelayError>;
}
