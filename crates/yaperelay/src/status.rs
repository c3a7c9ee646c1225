// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `status` subcommand: configuration summary, database health, and
//! last-seen diagnostics.

use yaperelay_config::RelayConfig;
use yaperelay_core::{EventStore, RelayError, SettingsStore};
use yaperelay_storage::SqliteStorage;

pub async fn run(config: &RelayConfig) -> Result<(), RelayError> {
    println!("yaperelay status");
    println!("  database:      {}", config.storage.database_path);
    println!("  wal mode:      {}", config.storage.wal_mode);
    println!("  log level:     {}", config.relay.log_level);
    println!("  keywords:      {}", config.relay.keywords.join(", "));

    let storage = SqliteStorage::open(&config.storage).await?;

    let enabled = storage.is_enabled().await?;
    let snapshot = storage.snapshot().await?;
    println!("  enabled:       {enabled}");
    println!("  capture-all:   {}", snapshot.capture_all);

    let packages = storage.watched_packages().await?;
    println!("  packages:      {}", packages.len());
    for p in &packages {
        println!("    - {}", p.package);
    }

    let contacts = storage.contacts().await?;
    println!("  destinations:  {}", contacts.len());

    println!("  events stored: {}", storage.count().await?);

    let (last_package, last_text) = storage.last_seen().await?;
    if last_package.is_empty() {
        println!("  last seen:     (none)");
    } else {
        println!("  last seen:     {last_package}: {last_text}");
    }

    storage.close().await
}
