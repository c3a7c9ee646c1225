// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete yaperelay pipeline.
//!
//! Each test creates an isolated TestHarness with a temp SQLite database
//! and mock collaborators. Tests are independent and order-insensitive.

use yaperelay_core::{
    DateFilter, EventStore, NotificationExtras, RawNotification, SettingsStore,
    DEFAULT_WATCHED_PACKAGE, UNKNOWN_AMOUNT,
};
use yaperelay_engine::Outcome;
use yaperelay_test_utils::TestHarness;

fn notification(key: &str, package: &str, post_time: i64, text: &str) -> RawNotification {
    RawNotification {
        key: key.to_string(),
        package: package.to_string(),
        post_time,
        extras: NotificationExtras {
            text: text.to_string(),
            ..Default::default()
        },
    }
}

// ---- Forwarding path ----

#[tokio::test]
async fn yape_notification_is_extracted_forwarded_and_stored() {
    let harness = TestHarness::builder()
        .with_number("+51987654321")
        .build()
        .await
        .unwrap();

    let outcome = harness
        .deliver(&notification(
            "0|yape|1001",
            DEFAULT_WATCHED_PACKAGE,
            1_000,
            "Te han yapeado S/ 25.00 a las 10:30",
        ))
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::Captured { forwarded: true, .. }));

    let events = harness.storage().recent(10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].amount, "S/ 25.00");
    assert_eq!(events[0].time, "10:30");
    assert!(events[0].forwarded);
    assert_eq!(events[0].package, DEFAULT_WATCHED_PACKAGE);

    let sent = harness.sender().sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+51987654321");
    assert_eq!(sent[0].1, "Te han yapeado S/ 25.00 a las 10:30");
    assert_eq!(harness.notifier().refresh_count(), 1);
}

#[tokio::test]
async fn every_destination_receives_a_copy() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .with_number("+51922222222")
        .build()
        .await
        .unwrap();

    harness
        .deliver_text("k1", DEFAULT_WATCHED_PACKAGE, "Te han yapeado S/ 7.00")
        .await
        .unwrap();

    let sent = harness.sender().sent_messages().await;
    assert_eq!(sent.len(), 2);
    let numbers: Vec<&str> = sent.iter().map(|(n, _)| n.as_str()).collect();
    assert!(numbers.contains(&"+51911111111"));
    assert!(numbers.contains(&"+51922222222"));
}

#[tokio::test]
async fn partial_delivery_failure_marks_event_not_forwarded() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .with_number("+51922222222")
        .with_failing_number("+51922222222")
        .build()
        .await
        .unwrap();

    let outcome = harness
        .deliver_text("k1", DEFAULT_WATCHED_PACKAGE, "Te han yapeado S/ 7.00")
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        Outcome::Captured {
            forwarded: false,
            ..
        }
    ));
    // The event is still recorded exactly once.
    assert_eq!(harness.event_count().await.unwrap(), 1);
}

#[tokio::test]
async fn no_destinations_records_with_forwarded_false() {
    let harness = TestHarness::builder().build().await.unwrap();

    let outcome = harness
        .deliver_text("k1", DEFAULT_WATCHED_PACKAGE, "Te han yapeado S/ 7.00")
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        Outcome::Captured {
            forwarded: false,
            ..
        }
    ));
    let events = harness.storage().recent(10).await.unwrap();
    assert_eq!(events.len(), 1);
    assert!(!events[0].forwarded);
}

#[tokio::test]
async fn missing_amount_is_stored_as_unknown_sentinel() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    harness
        .deliver_text("k1", DEFAULT_WATCHED_PACKAGE, "Recibiste un yape")
        .await
        .unwrap();

    let events = harness.storage().recent(1).await.unwrap();
    assert_eq!(events[0].amount, UNKNOWN_AMOUNT);
}

// ---- Early exits ----

#[tokio::test]
async fn disabled_pipeline_writes_nothing() {
    let harness = TestHarness::builder()
        .disabled()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    let outcome = harness
        .deliver_text("k1", DEFAULT_WATCHED_PACKAGE, "Te han yapeado S/ 9.99")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Disabled);
    assert_eq!(harness.event_count().await.unwrap(), 0);
    assert_eq!(harness.sender().sent_count().await, 0);
    let (last_package, _) = harness.storage().last_seen().await.unwrap();
    assert_eq!(last_package, "");
}

#[tokio::test]
async fn unwatched_package_is_filtered() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    let outcome = harness
        .deliver_text("k1", "com.random.app", "Te han yapeado S/ 9.99")
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::FilteredPackage);
    assert_eq!(harness.event_count().await.unwrap(), 0);
}

#[tokio::test]
async fn capture_all_accepts_any_package_without_sending() {
    let harness = TestHarness::builder()
        .with_capture_all()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    let outcome = harness
        .deliver_text("k1", "com.random.app", "cualquier notificacion")
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        Outcome::Captured {
            forwarded: false,
            ..
        }
    ));
    assert_eq!(harness.sender().sent_count().await, 0);
    assert_eq!(harness.event_count().await.unwrap(), 1);
}

#[tokio::test]
async fn blank_text_stops_before_capture_all_branch() {
    let harness = TestHarness::builder().with_capture_all().build().await.unwrap();

    let outcome = harness
        .deliver(&RawNotification {
            key: "k1".to_string(),
            package: "com.random.app".to_string(),
            post_time: 1_000,
            extras: NotificationExtras::default(),
        })
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::EmptyText);
    assert_eq!(harness.event_count().await.unwrap(), 0);
    // The diagnostic write still happened for the passing package.
    let (last_package, last_text) = harness.storage().last_seen().await.unwrap();
    assert_eq!(last_package, "com.random.app");
    assert_eq!(last_text, "");
}

// ---- Dedup behavior through the stack ----

#[tokio::test]
async fn redelivered_key_is_processed_once() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    let n = notification(
        "0|yape|1001",
        DEFAULT_WATCHED_PACKAGE,
        1_000,
        "Te han yapeado S/ 5.00",
    );

    assert!(matches!(
        harness.deliver(&n).await.unwrap(),
        Outcome::Captured { .. }
    ));
    assert_eq!(harness.deliver(&n).await.unwrap(), Outcome::Duplicate);

    assert_eq!(harness.event_count().await.unwrap(), 1);
    assert_eq!(harness.sender().sent_count().await, 1);
}

#[tokio::test]
async fn same_payload_under_fresh_key_is_a_duplicate() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    let first = notification(
        "key-a",
        DEFAULT_WATCHED_PACKAGE,
        1_000,
        "Te han yapeado S/ 5.00",
    );
    let redelivery = notification(
        "key-b",
        DEFAULT_WATCHED_PACKAGE,
        1_000,
        "Te han yapeado S/ 5.00",
    );

    assert!(matches!(
        harness.deliver(&first).await.unwrap(),
        Outcome::Captured { .. }
    ));
    assert_eq!(
        harness.deliver(&redelivery).await.unwrap(),
        Outcome::Duplicate
    );
    assert_eq!(harness.event_count().await.unwrap(), 1);
}

#[tokio::test]
async fn dedup_reset_allows_reprocessing() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    let n = notification(
        "key-a",
        DEFAULT_WATCHED_PACKAGE,
        1_000,
        "Te han yapeado S/ 5.00",
    );

    harness.deliver(&n).await.unwrap();
    harness.pipeline().reset_dedup().await;
    assert!(matches!(
        harness.deliver(&n).await.unwrap(),
        Outcome::Captured { .. }
    ));
    assert_eq!(harness.event_count().await.unwrap(), 2);
}

// ---- History queries ----

#[tokio::test]
async fn recent_filter_returns_newest_first() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    for i in 0..3 {
        harness
            .deliver_text(
                &format!("k{i}"),
                DEFAULT_WATCHED_PACKAGE,
                &format!("Te han yapeado S/ {i}.00"),
            )
            .await
            .unwrap();
    }

    let events = harness
        .storage()
        .query(&DateFilter::Recent, 2)
        .await
        .unwrap();
    assert_eq!(events.len(), 2);
    assert!(events[0].id > events[1].id);
}

#[tokio::test]
async fn today_filter_includes_just_captured_events() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    harness
        .deliver_text("k1", DEFAULT_WATCHED_PACKAGE, "Te han yapeado S/ 1.00")
        .await
        .unwrap();

    let events = harness
        .storage()
        .query(&DateFilter::Today, 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);

    let yesterday = harness
        .storage()
        .query(&DateFilter::Yesterday, 10)
        .await
        .unwrap();
    assert!(yesterday.is_empty());
}

// ---- Settings round trips through the running stack ----

#[tokio::test]
async fn added_package_is_picked_up_by_next_snapshot() {
    let harness = TestHarness::builder()
        .with_number("+51911111111")
        .build()
        .await
        .unwrap();

    let outcome = harness
        .deliver_text("k1", "com.bbva.plin", "Te han yapeado S/ 2.00")
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::FilteredPackage);

    harness
        .storage()
        .add_package(&yaperelay_core::WatchedPackage {
            name: "Plin".to_string(),
            package: "com.bbva.plin".to_string(),
        })
        .await
        .unwrap();

    let outcome = harness
        .deliver_text("k2", "com.bbva.plin", "Te han yapeado S/ 3.00")
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Captured { .. }));
}
