// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full stack -- temp SQLite database, mock
//! sender, mock notifier, and the event pipeline -- and provides
//! `deliver()` to drive a raw notification through it.

use std::sync::Arc;

use tempfile::TempDir;

use yaperelay_config::model::{RelayConfig, StorageConfig};
use yaperelay_core::{
    EventStore, NotificationExtras, RawNotification, RelayError, SettingsStore, SmsContact,
};
use yaperelay_engine::{EventPipeline, Outcome};
use yaperelay_storage::SqliteStorage;

use crate::mock_notifier::MockNotifier;
use crate::mock_sender::MockSender;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    enabled: bool,
    capture_all: bool,
    numbers: Vec<String>,
    failing_numbers: Vec<String>,
    sender_available: bool,
    keywords: Option<Vec<String>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            enabled: true,
            capture_all: false,
            numbers: Vec::new(),
            failing_numbers: Vec::new(),
            sender_available: true,
            keywords: None,
        }
    }

    /// Leave the service-enabled flag off.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Turn on capture-all (test) mode.
    pub fn with_capture_all(mut self) -> Self {
        self.capture_all = true;
        self
    }

    /// Configure a destination number.
    pub fn with_number(mut self, number: &str) -> Self {
        self.numbers.push(number.to_string());
        self
    }

    /// Make deliveries to `number` fail.
    pub fn with_failing_number(mut self, number: &str) -> Self {
        self.failing_numbers.push(number.to_string());
        self
    }

    /// Simulate missing send permission.
    pub fn with_sender_unavailable(mut self) -> Self {
        self.sender_available = false;
        self
    }

    /// Override the relevance keyword list (defaults to the config
    /// defaults).
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = Some(keywords);
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, RelayError> {
        let temp_dir = TempDir::new().map_err(|e| RelayError::Storage {
            source: Box::new(e),
        })?;
        let db_path = temp_dir.path().join("test.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        let storage = Arc::new(SqliteStorage::open(&storage_config).await?);

        storage.set_enabled(self.enabled).await?;
        storage.set_capture_all(self.capture_all).await?;
        for number in &self.numbers {
            storage
                .add_contact(&SmsContact {
                    name: String::new(),
                    number: number.clone(),
                })
                .await?;
        }

        let sender = Arc::new(MockSender::new());
        sender.set_available(self.sender_available);
        for number in &self.failing_numbers {
            sender.fail_number(number);
        }

        let notifier = Arc::new(MockNotifier::new());

        let keywords = self
            .keywords
            .unwrap_or_else(|| RelayConfig::default().relay.keywords);

        let pipeline = EventPipeline::new(
            storage.clone(),
            storage.clone(),
            sender.clone(),
            notifier.clone(),
            keywords,
        );

        Ok(TestHarness {
            storage,
            sender,
            notifier,
            pipeline,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully assembled pipeline over a scratch database and mock
/// collaborators.
pub struct TestHarness {
    storage: Arc<SqliteStorage>,
    sender: Arc<MockSender>,
    notifier: Arc<MockNotifier>,
    pipeline: EventPipeline,
    _temp_dir: TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drive one notification through the pipeline.
    pub async fn deliver(&self, notification: &RawNotification) -> Result<Outcome, RelayError> {
        self.pipeline.handle(notification).await
    }

    /// Shorthand for delivering a body-text-only notification.
    pub async fn deliver_text(
        &self,
        key: &str,
        package: &str,
        text: &str,
    ) -> Result<Outcome, RelayError> {
        self.deliver(&RawNotification {
            key: key.to_string(),
            package: package.to_string(),
            post_time: 1_000,
            extras: NotificationExtras {
                text: text.to_string(),
                ..Default::default()
            },
        })
        .await
    }

    pub fn storage(&self) -> &Arc<SqliteStorage> {
        &self.storage
    }

    pub fn sender(&self) -> &MockSender {
        &self.sender
    }

    pub fn notifier(&self) -> &MockNotifier {
        &self.notifier
    }

    pub fn pipeline(&self) -> &EventPipeline {
        &self.pipeline
    }

    pub async fn event_count(&self) -> Result<i64, RelayError> {
        self.storage.count().await
    }
}
