// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event store trait: bounded append-only log of captured events.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::{CapturedEvent, DateFilter};

/// Maximum number of events retained by the store. Appends beyond this
/// purge the oldest rows.
pub const MAX_EVENTS: i64 = 500;

/// Bounded append-only log of captured events, queryable by recency or
/// date range.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends an event and returns its store-assigned identifier.
    ///
    /// Implementations enforce the [`MAX_EVENTS`] retention cap after each
    /// insert by deleting the oldest rows beyond the cap.
    async fn append(&self, event: &CapturedEvent) -> Result<i64, RelayError>;

    /// Returns up to `limit` events, newest first.
    async fn recent(&self, limit: i64) -> Result<Vec<CapturedEvent>, RelayError>;

    /// Returns events with `start_ms <= timestamp <= end_ms`, newest first.
    async fn by_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<CapturedEvent>, RelayError>;

    /// Number of events currently retained.
    async fn count(&self) -> Result<i64, RelayError>;

    /// Resolves a [`DateFilter`] to the matching query.
    ///
    /// `Recent` maps to [`EventStore::recent`] with the given limit; every
    /// other filter resolves to a concrete range here, at the query
    /// boundary, not inside the pipeline.
    async fn query(
        &self,
        filter: &DateFilter,
        recent_limit: i64,
    ) -> Result<Vec<CapturedEvent>, RelayError> {
        match filter.range(chrono::Local::now()) {
            None => self.recent(recent_limit).await,
            Some((start_ms, end_ms)) => self.by_range(start_ms, end_ms).await,
        }
    }
}
