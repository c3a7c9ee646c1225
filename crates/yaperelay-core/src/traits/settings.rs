// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings store trait: durable key-value settings behind typed operations.

use async_trait::async_trait;

use crate::error::RelayError;
use crate::types::{SettingsSnapshot, SmsContact, WatchedPackage};

/// Durable store for the watched-package list, destination contacts, the
/// capture-all and service-enabled flags, and last-seen diagnostics.
///
/// Each operation is a single durable read or write; the pipeline's
/// consistency comes from reading [`snapshot`](SettingsStore::snapshot)
/// once per notification rather than from transactions across calls.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// One consistent read of the settings that drive pipeline decisions.
    async fn snapshot(&self) -> Result<SettingsSnapshot, RelayError>;

    /// Whether the pipeline should process notifications at all.
    async fn is_enabled(&self) -> Result<bool, RelayError>;

    async fn set_enabled(&self, enabled: bool) -> Result<(), RelayError>;

    async fn set_capture_all(&self, enabled: bool) -> Result<(), RelayError>;

    /// Records the most recent (package, text) that passed the package
    /// filter, for diagnostics.
    async fn set_last_seen(&self, package: &str, text: &str) -> Result<(), RelayError>;

    /// The last recorded (package, text) pair; empty strings when unset.
    async fn last_seen(&self) -> Result<(String, String), RelayError>;

    // --- Destination contacts (uniqueness by number) ---

    async fn contacts(&self) -> Result<Vec<SmsContact>, RelayError>;

    /// Adds a contact. Blank numbers and duplicate numbers are ignored.
    async fn add_contact(&self, contact: &SmsContact) -> Result<(), RelayError>;

    async fn remove_contact(&self, number: &str) -> Result<(), RelayError>;

    // --- Watched packages (uniqueness by package identifier) ---

    /// The current watched-package list, after legacy-format migration and
    /// default seeding.
    async fn watched_packages(&self) -> Result<Vec<WatchedPackage>, RelayError>;

    /// Adds a package. Blank identifiers and duplicate identifiers are
    /// ignored.
    async fn add_package(&self, package: &WatchedPackage) -> Result<(), RelayError>;

    async fn remove_package(&self, package_id: &str) -> Result<(), RelayError>;

    /// Replaces the entry whose identifier is `old_id`. No-op when absent
    /// or when the replacement's identifier is blank.
    async fn update_package(
        &self,
        old_id: &str,
        updated: &WatchedPackage,
    ) -> Result<(), RelayError>;
}
