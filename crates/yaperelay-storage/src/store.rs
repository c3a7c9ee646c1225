// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the EventStore and SettingsStore traits.
//!
//! One `SqliteStorage` serves both traits over a single [`Database`]
//! handle; list-valued settings are JSON strings in the `settings` table.
//! The watched-package list supports migration from the legacy flat-array
//! encoding and is default-seeded when nothing is configured.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::{debug, warn};

use yaperelay_config::model::StorageConfig;
use yaperelay_core::{
    CapturedEvent, EventStore, RelayError, SettingsSnapshot, SettingsStore, SmsContact,
    WatchedPackage, DEFAULT_WATCHED_PACKAGE,
};

use crate::database::{map_tr_err, Database};
use crate::queries;
use crate::queries::settings::{read_value, write_value};

mod keys {
    pub const CONTACTS: &str = "sms_contacts_json";
    pub const PACKAGES: &str = "watch_packages_json";
    /// Flat JSON array of package identifiers, from before the list grew
    /// display names.
    pub const PACKAGES_LEGACY: &str = "watch_packages";
    pub const LAST_SEEN_PACKAGE: &str = "last_seen_package";
    pub const LAST_SEEN_TEXT: &str = "last_seen_text";
    pub const CAPTURE_ALL: &str = "capture_all_v2";
    pub const SERVICE_ENABLED: &str = "service_enabled";
}

/// SQLite-backed event and settings store.
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    /// Opens the database named by `config`, running migrations as needed.
    pub async fn open(config: &StorageConfig) -> Result<Self, RelayError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite storage initialized");
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoints and releases the connection.
    pub async fn close(&self) -> Result<(), RelayError> {
        self.db.close().await
    }
}

#[async_trait]
impl EventStore for SqliteStorage {
    async fn append(&self, event: &CapturedEvent) -> Result<i64, RelayError> {
        queries::events::insert_event(&self.db, event).await
    }

    async fn recent(&self, limit: i64) -> Result<Vec<CapturedEvent>, RelayError> {
        queries::events::recent_events(&self.db, limit).await
    }

    async fn by_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<CapturedEvent>, RelayError> {
        queries::events::events_by_range(&self.db, start_ms, end_ms).await
    }

    async fn count(&self) -> Result<i64, RelayError> {
        queries::events::count_events(&self.db).await
    }
}

#[async_trait]
impl SettingsStore for SqliteStorage {
    async fn snapshot(&self) -> Result<SettingsSnapshot, RelayError> {
        let all = queries::settings::get_all(&self.db).await?;
        Ok(snapshot_from(&all))
    }

    async fn is_enabled(&self) -> Result<bool, RelayError> {
        let value = queries::settings::get_value(&self.db, keys::SERVICE_ENABLED).await?;
        Ok(flag(value.as_deref()))
    }

    async fn set_enabled(&self, enabled: bool) -> Result<(), RelayError> {
        queries::settings::set_value(&self.db, keys::SERVICE_ENABLED, bool_str(enabled)).await
    }

    async fn set_capture_all(&self, enabled: bool) -> Result<(), RelayError> {
        queries::settings::set_value(&self.db, keys::CAPTURE_ALL, bool_str(enabled)).await
    }

    async fn set_last_seen(&self, package: &str, text: &str) -> Result<(), RelayError> {
        queries::settings::set_many(
            &self.db,
            vec![
                (keys::LAST_SEEN_PACKAGE.to_string(), package.to_string()),
                (keys::LAST_SEEN_TEXT.to_string(), text.to_string()),
            ],
        )
        .await
    }

    async fn last_seen(&self) -> Result<(String, String), RelayError> {
        let all = queries::settings::get_all(&self.db).await?;
        Ok((
            all.get(keys::LAST_SEEN_PACKAGE).cloned().unwrap_or_default(),
            all.get(keys::LAST_SEEN_TEXT).cloned().unwrap_or_default(),
        ))
    }

    async fn contacts(&self) -> Result<Vec<SmsContact>, RelayError> {
        let raw = queries::settings::get_value(&self.db, keys::CONTACTS).await?;
        Ok(parse_contacts(raw.as_deref().unwrap_or_default()))
    }

    async fn add_contact(&self, contact: &SmsContact) -> Result<(), RelayError> {
        if contact.number.trim().is_empty() {
            return Ok(());
        }
        let contact = contact.clone();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut current =
                    parse_contacts(read_value(&tx, keys::CONTACTS)?.as_deref().unwrap_or_default());
                if !current.iter().any(|c| c.number == contact.number) {
                    current.push(contact);
                }
                write_value(&tx, keys::CONTACTS, &encode_json(&current))?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn remove_contact(&self, number: &str) -> Result<(), RelayError> {
        let number = number.to_string();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut current =
                    parse_contacts(read_value(&tx, keys::CONTACTS)?.as_deref().unwrap_or_default());
                current.retain(|c| c.number != number);
                write_value(&tx, keys::CONTACTS, &encode_json(&current))?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn watched_packages(&self) -> Result<Vec<WatchedPackage>, RelayError> {
        let all = queries::settings::get_all(&self.db).await?;
        Ok(resolve_packages(
            all.get(keys::PACKAGES).map(String::as_str),
            all.get(keys::PACKAGES_LEGACY).map(String::as_str),
        ))
    }

    async fn add_package(&self, package: &WatchedPackage) -> Result<(), RelayError> {
        if package.package.trim().is_empty() {
            return Ok(());
        }
        let package = package.clone();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut current = resolve_in_tx(&tx)?;
                if !current.iter().any(|p| p.package == package.package) {
                    current.push(package);
                }
                write_value(&tx, keys::PACKAGES, &encode_json(&current))?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn remove_package(&self, package_id: &str) -> Result<(), RelayError> {
        let package_id = package_id.to_string();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut current = resolve_in_tx(&tx)?;
                current.retain(|p| p.package != package_id);
                write_value(&tx, keys::PACKAGES, &encode_json(&current))?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn update_package(
        &self,
        old_id: &str,
        updated: &WatchedPackage,
    ) -> Result<(), RelayError> {
        if updated.package.trim().is_empty() {
            return Ok(());
        }
        let old_id = old_id.to_string();
        let updated = updated.clone();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut current = resolve_in_tx(&tx)?;
                if let Some(entry) = current.iter_mut().find(|p| p.package == old_id) {
                    *entry = updated;
                }
                write_value(&tx, keys::PACKAGES, &encode_json(&current))?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn flag(value: Option<&str>) -> bool {
    value == Some("true")
}

fn snapshot_from(all: &HashMap<String, String>) -> SettingsSnapshot {
    let packages: HashSet<String> = resolve_packages(
        all.get(keys::PACKAGES).map(String::as_str),
        all.get(keys::PACKAGES_LEGACY).map(String::as_str),
    )
    .into_iter()
    .map(|p| p.package)
    .collect();

    let numbers: HashSet<String> =
        parse_contacts(all.get(keys::CONTACTS).map(String::as_str).unwrap_or_default())
            .into_iter()
            .map(|c| c.number)
            .collect();

    SettingsSnapshot {
        packages,
        capture_all: flag(all.get(keys::CAPTURE_ALL).map(String::as_str)),
        numbers,
    }
}

/// Resolve the watched-package list inside a running transaction.
fn resolve_in_tx(tx: &rusqlite::Connection) -> Result<Vec<WatchedPackage>, rusqlite::Error> {
    Ok(resolve_packages(
        read_value(tx, keys::PACKAGES)?.as_deref(),
        read_value(tx, keys::PACKAGES_LEGACY)?.as_deref(),
    ))
}

/// Two-stage decode of the watched-package list: structured JSON first,
/// then the legacy flat array, then the hardcoded default entry.
fn resolve_packages(structured: Option<&str>, legacy: Option<&str>) -> Vec<WatchedPackage> {
    if let Some(json) = structured.filter(|s| !s.trim().is_empty()) {
        return parse_packages(json);
    }

    if let Some(raw) = legacy.filter(|s| !s.trim().is_empty()) {
        let ids: Vec<String> = serde_json::from_str(raw).unwrap_or_else(|e| {
            warn!(error = %e, "failed to parse legacy package list");
            Vec::new()
        });
        if !ids.is_empty() {
            return ids
                .into_iter()
                .map(|id| WatchedPackage {
                    name: String::new(),
                    package: id,
                })
                .collect();
        }
    }

    vec![WatchedPackage {
        name: "Yape".to_string(),
        package: DEFAULT_WATCHED_PACKAGE.to_string(),
    }]
}

fn parse_packages(raw: &str) -> Vec<WatchedPackage> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(error = %e, "failed to parse packages JSON");
        Vec::new()
    })
}

fn parse_contacts(raw: &str) -> Vec<SmsContact> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(error = %e, "failed to parse contacts JSON");
        Vec::new()
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}
