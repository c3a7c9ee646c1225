// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the yaperelay workspace.

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Package identifier of the payment app watched by default when no
/// packages have been configured.
pub const DEFAULT_WATCHED_PACKAGE: &str = "com.bcp.innovacxion.yapeapp";

/// Sentinel stored as the amount when extraction produced nothing for a
/// forwarded event.
pub const UNKNOWN_AMOUNT: &str = "S/ ?";

/// A record of one processed notification.
///
/// Created by the pipeline after a successful processing decision and
/// immutable once stored. `id` is assigned by the event store on insert
/// and is unique and monotonically increasing by insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedEvent {
    /// Store-assigned identifier; 0 until the event has been appended.
    #[serde(default)]
    pub id: i64,
    /// Extracted amount, currency-prefixed. May be empty or [`UNKNOWN_AMOUNT`].
    pub amount: String,
    /// Extracted `HH:MM` time. May be empty.
    pub time: String,
    /// Raw notification text.
    pub text: String,
    /// Capture time in epoch milliseconds (process time, not post time).
    pub timestamp: i64,
    /// Whether delivery succeeded to every configured destination.
    pub forwarded: bool,
    /// Source package identifier.
    pub package: String,
}

/// A user-managed entry in the watched-package list.
///
/// `package` is the identity key; `name` is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedPackage {
    #[serde(default)]
    pub name: String,
    pub package: String,
}

/// A destination for forwarded messages. Uniqueness by `number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsContact {
    #[serde(default)]
    pub name: String,
    pub number: String,
}

/// An immutable read of the settings that drive pipeline decisions.
///
/// Taken once per incoming notification so every decision point sees the
/// same view even if settings change mid-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub packages: std::collections::HashSet<String>,
    pub capture_all: bool,
    pub numbers: std::collections::HashSet<String>,
}

/// The named text fields carried by a notification, in preference order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationExtras {
    #[serde(default)]
    pub big_text: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary_text: String,
    #[serde(default)]
    pub sub_text: String,
}

impl NotificationExtras {
    /// Returns the first non-blank field, trimmed: long-form body, short
    /// body, title, summary, sub text. Empty string when all are blank.
    pub fn content_text(&self) -> String {
        for field in [
            &self.big_text,
            &self.text,
            &self.title,
            &self.summary_text,
            &self.sub_text,
        ] {
            let trimmed = field.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
        String::new()
    }
}

/// A raw notification as delivered by the notification source.
///
/// `key` is the source-provided identifier; delivery may repeat with the
/// same key or with a fresh key and identical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNotification {
    pub key: String,
    pub package: String,
    pub post_time: i64,
    #[serde(default)]
    pub extras: NotificationExtras,
}

/// Date filter for event-history queries, resolved to a concrete range at
/// the query boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFilter {
    Recent,
    Today,
    Yesterday,
    ThisWeek,
    Custom { start_ms: i64, end_ms: i64 },
}

impl DateFilter {
    /// Resolves the filter to an inclusive `(start_ms, end_ms)` range in
    /// local time. `Recent` carries no range and returns `None`.
    pub fn range(&self, now: DateTime<Local>) -> Option<(i64, i64)> {
        match self {
            DateFilter::Recent => None,
            DateFilter::Today => Some(day_range(now.date_naive())),
            DateFilter::Yesterday => Some(day_range(now.date_naive() - Duration::days(1))),
            DateFilter::ThisWeek => {
                let monday = now.date_naive()
                    - Duration::days(now.weekday().num_days_from_monday() as i64);
                Some((
                    start_of_day(monday).timestamp_millis(),
                    now.timestamp_millis(),
                ))
            }
            DateFilter::Custom { start_ms, end_ms } => Some((*start_ms, *end_ms)),
        }
    }
}

fn day_range(day: NaiveDate) -> (i64, i64) {
    let start = start_of_day(day).timestamp_millis();
    let end = start_of_day(day + Duration::days(1)).timestamp_millis() - 1;
    (start, end)
}

/// Local midnight for the given day. Around DST transitions midnight can
/// be ambiguous or missing; the earliest valid interpretation wins.
fn start_of_day(day: NaiveDate) -> DateTime<Local> {
    let midnight = day.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => Local.from_utc_datetime(&midnight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_text_prefers_big_text() {
        let extras = NotificationExtras {
            big_text: "  long body  ".to_string(),
            text: "short body".to_string(),
            title: "title".to_string(),
            ..Default::default()
        };
        assert_eq!(extras.content_text(), "long body");
    }

    #[test]
    fn content_text_falls_through_blank_fields() {
        let extras = NotificationExtras {
            big_text: "   ".to_string(),
            text: String::new(),
            title: "Yape".to_string(),
            ..Default::default()
        };
        assert_eq!(extras.content_text(), "Yape");
    }

    #[test]
    fn content_text_empty_when_all_blank() {
        assert_eq!(NotificationExtras::default().content_text(), "");
    }

    #[test]
    fn raw_notification_deserializes_with_partial_extras() {
        let json = r#"{"key":"0|com.app|1","package":"com.app","post_time":1000,"extras":{"text":"hola"}}"#;
        let n: RawNotification = serde_json::from_str(json).unwrap();
        assert_eq!(n.key, "0|com.app|1");
        assert_eq!(n.extras.content_text(), "hola");
        assert!(n.extras.big_text.is_empty());
    }

    #[test]
    fn recent_filter_has_no_range() {
        assert_eq!(DateFilter::Recent.range(Local::now()), None);
    }

    #[test]
    fn today_range_covers_now() {
        let now = Local::now();
        let (start, end) = DateFilter::Today.range(now).unwrap();
        let now_ms = now.timestamp_millis();
        assert!(start <= now_ms && now_ms <= end);
    }

    #[test]
    fn yesterday_ends_before_today_starts() {
        let now = Local::now();
        let (_, y_end) = DateFilter::Yesterday.range(now).unwrap();
        let (t_start, _) = DateFilter::Today.range(now).unwrap();
        assert_eq!(y_end + 1, t_start);
    }

    #[test]
    fn custom_range_passes_through() {
        let f = DateFilter::Custom {
            start_ms: 100,
            end_ms: 200,
        };
        assert_eq!(f.range(Local::now()), Some((100, 200)));
    }
}
