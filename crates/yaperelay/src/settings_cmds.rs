// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings management subcommands: watched packages, destination
//! contacts, and the pipeline flags.

use clap::Subcommand;

use yaperelay_config::RelayConfig;
use yaperelay_core::{RelayError, SettingsStore, SmsContact, WatchedPackage};
use yaperelay_engine::extract;
use yaperelay_storage::SqliteStorage;

#[derive(Subcommand, Debug)]
pub enum PackageAction {
    /// List watched packages.
    List,
    /// Add a package to the watched list.
    Add {
        /// Package identifier, e.g. com.bcp.innovacxion.yapeapp.
        package: String,
        /// Display name.
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Remove a package by identifier.
    Remove { package: String },
    /// Replace a watched entry, keyed by its current identifier.
    Update {
        /// Identifier of the entry to replace.
        old: String,
        /// New package identifier.
        package: String,
        /// New display name.
        #[arg(long, default_value = "")]
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactAction {
    /// List destination contacts.
    List,
    /// Add a destination number.
    Add {
        /// Destination number, e.g. +51987654321.
        number: String,
        /// Display name.
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Remove a destination by number.
    Remove { number: String },
}

pub async fn run_packages(config: &RelayConfig, action: PackageAction) -> Result<(), RelayError> {
    let storage = SqliteStorage::open(&config.storage).await?;

    match action {
        PackageAction::List => {
            for p in storage.watched_packages().await? {
                if p.name.is_empty() {
                    println!("{}", p.package);
                } else {
                    println!("{}  ({})", p.package, p.name);
                }
            }
        }
        PackageAction::Add { package, name } => {
            storage
                .add_package(&WatchedPackage {
                    name,
                    package: package.clone(),
                })
                .await?;
            println!("watching {package}");
        }
        PackageAction::Remove { package } => {
            storage.remove_package(&package).await?;
            println!("removed {package}");
        }
        PackageAction::Update { old, package, name } => {
            storage
                .update_package(
                    &old,
                    &WatchedPackage {
                        name,
                        package: package.clone(),
                    },
                )
                .await?;
            println!("updated {old} -> {package}");
        }
    }

    storage.close().await
}

pub async fn run_contacts(config: &RelayConfig, action: ContactAction) -> Result<(), RelayError> {
    let storage = SqliteStorage::open(&config.storage).await?;

    match action {
        ContactAction::List => {
            for c in storage.contacts().await? {
                if c.name.is_empty() {
                    println!("{}", c.number);
                } else {
                    println!("{}  ({})", c.number, c.name);
                }
            }
        }
        ContactAction::Add { number, name } => {
            if !extract::is_valid_number(&number) {
                return Err(RelayError::Config(format!(
                    "`{number}` is not a valid destination number"
                )));
            }
            storage
                .add_contact(&SmsContact {
                    name,
                    number: number.clone(),
                })
                .await?;
            println!("added {number}");
        }
        ContactAction::Remove { number } => {
            storage.remove_contact(&number).await?;
            println!("removed {number}");
        }
    }

    storage.close().await
}

pub async fn set_enabled(config: &RelayConfig, enabled: bool) -> Result<(), RelayError> {
    let storage = SqliteStorage::open(&config.storage).await?;
    storage.set_enabled(enabled).await?;
    println!(
        "pipeline {}",
        if enabled { "enabled" } else { "disabled" }
    );
    storage.close().await
}

pub async fn set_capture_all(config: &RelayConfig, state: &str) -> Result<(), RelayError> {
    let enabled = match state {
        "on" => true,
        "off" => false,
        other => {
            return Err(RelayError::Config(format!(
                "expected `on` or `off`, got `{other}`"
            )))
        }
    };
    let storage = SqliteStorage::open(&config.storage).await?;
    storage.set_capture_all(enabled).await?;
    println!("capture-all {state}");
    storage.close().await
}
