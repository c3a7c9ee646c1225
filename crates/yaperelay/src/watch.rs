// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The watch loop: reads an ndjson notification stream and drives each
//! line through the event pipeline.
//!
//! Real notification capture belongs to the host platform; this command is
//! the notification-source boundary for stream replay, testing, and
//! piping from an external capture tool.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

use yaperelay_config::RelayConfig;
use yaperelay_core::{DashboardNotifier, MessageSender, RawNotification, RelayError};
use yaperelay_engine::{EventPipeline, Outcome};
use yaperelay_storage::SqliteStorage;

/// Whether the notification source is currently attached. Owned by the
/// watch loop, reset on exit.
pub struct ConnectionStatus {
    connected: AtomicBool,
}

impl ConnectionStatus {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Message sender that logs deliveries instead of transmitting them.
///
/// The real SMS transport is platform territory; the trait boundary is
/// what the pipeline contracts against.
struct DryRunSender;

#[async_trait]
impl MessageSender for DryRunSender {
    fn is_available(&self) -> bool {
        true
    }

    async fn send(&self, number: &str, text: &str) -> Result<(), RelayError> {
        info!(number, text, "dry-run delivery");
        Ok(())
    }
}

/// Notifier that records refresh signals in the log.
struct LogNotifier;

impl DashboardNotifier for LogNotifier {
    fn refresh(&self) {
        debug!("dashboard refresh signal");
    }
}

/// Run the watch loop until the input stream ends.
pub async fn run(config: &RelayConfig, input: Option<PathBuf>) -> Result<(), RelayError> {
    let storage = Arc::new(SqliteStorage::open(&config.storage).await?);
    let pipeline = EventPipeline::new(
        storage.clone(),
        storage.clone(),
        Arc::new(DryRunSender),
        Arc::new(LogNotifier),
        config.relay.keywords.clone(),
    );

    let status = ConnectionStatus::new();
    status.set_connected(true);
    info!("notification source connected");

    let result = match input {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .map_err(|e| RelayError::Internal(format!("cannot open {}: {e}", path.display())))?;
            process_stream(&pipeline, BufReader::new(file)).await
        }
        None => process_stream(&pipeline, BufReader::new(tokio::io::stdin())).await,
    };

    status.set_connected(false);
    info!("notification source disconnected");
    storage.close().await?;
    result
}

/// Feed every ndjson line through the pipeline. Malformed lines and
/// per-notification failures are logged and skipped; only stream I/O
/// errors abort the loop.
async fn process_stream<R>(
    pipeline: &EventPipeline,
    reader: BufReader<R>,
) -> Result<(), RelayError>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = lines
            .next_line()
            .await
            .map_err(|e| RelayError::Internal(format!("stream read failed: {e}")))?;
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let notification: RawNotification = match serde_json::from_str(&line) {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "skipping malformed notification line");
                continue;
            }
        };

        match pipeline.handle(&notification).await {
            Ok(outcome) => log_outcome(&notification, &outcome),
            Err(e) => error!(key = %notification.key, error = %e, "processing failed"),
        }
    }
    Ok(())
}

fn log_outcome(notification: &RawNotification, outcome: &Outcome) {
    match outcome {
        Outcome::Disabled => debug!("pipeline disabled, notification ignored"),
        Outcome::FilteredPackage => {
            debug!(package = %notification.package, "package not watched")
        }
        Outcome::EmptyText => debug!(key = %notification.key, "no usable text"),
        Outcome::Irrelevant => debug!(key = %notification.key, "text not relevant"),
        Outcome::Duplicate => debug!(key = %notification.key, "duplicate delivery"),
        Outcome::Captured { id, forwarded } => {
            info!(event_id = id, forwarded, package = %notification.package, "event captured")
        }
    }
}
