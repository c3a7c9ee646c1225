// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for yaperelay.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the yaperelay workspace. The pipeline
//! engine and every collaborator implementation build on what is defined
//! here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RelayError;
pub use types::{
    CapturedEvent, DateFilter, NotificationExtras, RawNotification, SettingsSnapshot, SmsContact,
    WatchedPackage, DEFAULT_WATCHED_PACKAGE, UNKNOWN_AMOUNT,
};

pub use traits::{DashboardNotifier, EventStore, MessageSender, SettingsStore};
pub use traits::notifier::NoopNotifier;
pub use traits::store::MAX_EVENTS;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_error_variants_construct_and_display() {
        let config = RelayError::Config("bad value".into());
        assert!(config.to_string().contains("bad value"));

        let storage = RelayError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert!(storage.to_string().contains("disk gone"));

        let send = RelayError::Send {
            message: "unreachable".into(),
            source: None,
        };
        assert!(send.to_string().contains("unreachable"));

        let _internal = RelayError::Internal("test".into());
    }

    #[test]
    fn captured_event_roundtrips_through_serde() {
        let event = CapturedEvent {
            id: 7,
            amount: "S/ 25.00".to_string(),
            time: "10:30".to_string(),
            text: "Te han yapeado S/ 25.00 a las 10:30".to_string(),
            timestamp: 1_700_000_000_000,
            forwarded: true,
            package: DEFAULT_WATCHED_PACKAGE.to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CapturedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn noop_notifier_is_object_safe() {
        let notifier: Box<dyn DashboardNotifier> = Box::new(NoopNotifier);
        notifier.refresh();
    }
}
