// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the event pipeline.
//!
//! The pipeline itself is transport- and storage-agnostic: everything it
//! touches beyond its own dedup state goes through one of these traits.

pub mod notifier;
pub mod sender;
pub mod settings;
pub mod store;

pub use notifier::DashboardNotifier;
pub use sender::MessageSender;
pub use settings::SettingsStore;
pub use store::EventStore;
