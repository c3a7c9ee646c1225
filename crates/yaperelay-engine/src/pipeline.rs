// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The event pipeline: settings snapshot, package filter, text extraction,
//! relevance filter, dedup check, forward decision, persistence, refresh.
//!
//! Each incoming notification is processed independently end to end; the
//! only mutable state shared between runs is the dedup window, serialized
//! behind a mutex.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use yaperelay_core::{
    CapturedEvent, DashboardNotifier, EventStore, MessageSender, RawNotification, RelayError,
    SettingsStore, UNKNOWN_AMOUNT,
};

use crate::dedup::DedupWindow;
use crate::extract;

/// Where a notification's processing ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The global enable flag is off; nothing was touched.
    Disabled,
    /// Source package is not watched (and capture-all is off).
    FilteredPackage,
    /// The notification carried no usable text.
    EmptyText,
    /// Text failed the relevance check (and capture-all is off).
    Irrelevant,
    /// A repeat delivery within the dedup window.
    Duplicate,
    /// The event was recorded. `forwarded` is true only when delivery
    /// succeeded to every configured destination.
    Captured { id: i64, forwarded: bool },
}

/// Orchestrates the processing of raw notifications against the
/// collaborator boundary: settings store, event store, message sender,
/// and presentation notifier.
pub struct EventPipeline {
    settings: Arc<dyn SettingsStore>,
    events: Arc<dyn EventStore>,
    sender: Arc<dyn MessageSender>,
    notifier: Arc<dyn DashboardNotifier>,
    keywords: Vec<String>,
    dedup: Mutex<DedupWindow>,
}

impl EventPipeline {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        events: Arc<dyn EventStore>,
        sender: Arc<dyn MessageSender>,
        notifier: Arc<dyn DashboardNotifier>,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            settings,
            events,
            sender,
            notifier,
            keywords,
            dedup: Mutex::new(DedupWindow::new()),
        }
    }

    /// Clears the dedup window. For tests and diagnostics.
    pub async fn reset_dedup(&self) {
        self.dedup.lock().await.reset();
    }

    /// Processes one notification to completion.
    ///
    /// Extraction misses and delivery failures are handled locally (empty
    /// fields, `forwarded = false`); only settings/store failures surface
    /// as `Err`. At most one attempt per notification -- redelivery from
    /// the source is the retry mechanism, and the dedup window guards it.
    pub async fn handle(&self, notification: &RawNotification) -> Result<Outcome, RelayError> {
        if !self.settings.is_enabled().await? {
            return Ok(Outcome::Disabled);
        }

        // Single settings read; every decision below uses this snapshot.
        let snapshot = self.settings.snapshot().await?;

        let text = notification.extras.content_text();

        // Filter by package before any writes.
        if !snapshot.capture_all && !snapshot.packages.contains(&notification.package) {
            return Ok(Outcome::FilteredPackage);
        }

        // Only packages that passed the filter reach the diagnostics.
        self.settings
            .set_last_seen(&notification.package, &text)
            .await?;

        if text.is_empty() {
            return Ok(Outcome::EmptyText);
        }

        if !snapshot.capture_all && !extract::is_relevant(&text, &self.keywords) {
            return Ok(Outcome::Irrelevant);
        }

        {
            let mut dedup = self.dedup.lock().await;
            if dedup.should_skip(&notification.key, notification.post_time, &text) {
                debug!(key = %notification.key, "notification skipped by dedup");
                return Ok(Outcome::Duplicate);
            }
        }

        let amount = extract::extract_amount(&text);
        let time = extract::extract_time(&text);

        if snapshot.capture_all {
            let id = self
                .events
                .append(&CapturedEvent {
                    id: 0,
                    amount,
                    time,
                    text: text.clone(),
                    timestamp: now_ms(),
                    forwarded: false,
                    package: notification.package.clone(),
                })
                .await?;
            debug!(package = %notification.package, "captured (test mode)");
            self.notifier.refresh();
            return Ok(Outcome::Captured {
                id,
                forwarded: false,
            });
        }

        let mut forwarded = false;
        if !self.sender.is_available() {
            warn!("message sending unavailable, skipping delivery");
        } else if snapshot.numbers.is_empty() {
            warn!("no destination numbers configured");
        } else {
            let message = compose_message(&text, &amount, &time);
            forwarded = true;
            for number in &snapshot.numbers {
                match self.sender.send(number, &message).await {
                    Ok(()) => debug!(number = %number, "message delivered"),
                    Err(e) => {
                        warn!(number = %number, error = %e, "delivery failed");
                        forwarded = false;
                    }
                }
            }
        }

        let id = self
            .events
            .append(&CapturedEvent {
                id: 0,
                amount: if amount.is_empty() {
                    UNKNOWN_AMOUNT.to_string()
                } else {
                    amount
                },
                time,
                text: text.clone(),
                timestamp: now_ms(),
                forwarded,
                package: notification.package.clone(),
            })
            .await?;
        self.notifier.refresh();

        Ok(Outcome::Captured { id, forwarded })
    }
}

/// Message text for delivery: the raw notification text verbatim when
/// present, otherwise a templated fallback from the extracted fields.
fn compose_message(text: &str, amount: &str, time: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    let amount_part = if amount.is_empty() {
        UNKNOWN_AMOUNT
    } else {
        amount
    };
    if time.is_empty() {
        format!("Yape recibido: {amount_part}.")
    } else {
        format!("Yape recibido: {amount_part}. Hora: {time}.")
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
