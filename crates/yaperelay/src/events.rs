// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `events` subcommand: captured-event history with date filters.

use chrono::{Local, TimeZone};

use yaperelay_config::RelayConfig;
use yaperelay_core::{CapturedEvent, DateFilter, EventStore, RelayError};
use yaperelay_storage::SqliteStorage;

/// Resolve the CLI arguments into a [`DateFilter`].
///
/// `--from`/`--to` win over `--filter`; both must be present together.
fn parse_filter(
    filter: &str,
    from: Option<i64>,
    to: Option<i64>,
) -> Result<DateFilter, RelayError> {
    match (from, to) {
        (Some(start_ms), Some(end_ms)) => {
            if end_ms < start_ms {
                return Err(RelayError::Config(
                    "--to must not be earlier than --from".to_string(),
                ));
            }
            return Ok(DateFilter::Custom { start_ms, end_ms });
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(RelayError::Config(
                "--from and --to must be given together".to_string(),
            ));
        }
        (None, None) => {}
    }

    match filter {
        "recent" => Ok(DateFilter::Recent),
        "today" => Ok(DateFilter::Today),
        "yesterday" => Ok(DateFilter::Yesterday),
        "week" => Ok(DateFilter::ThisWeek),
        other => Err(RelayError::Config(format!(
            "unknown filter `{other}` (expected recent, today, yesterday, week)"
        ))),
    }
}

pub async fn run(
    config: &RelayConfig,
    filter: &str,
    from: Option<i64>,
    to: Option<i64>,
    limit: Option<i64>,
) -> Result<(), RelayError> {
    let filter = parse_filter(filter, from, to)?;
    let limit = limit.unwrap_or(config.relay.recent_limit);

    let storage = SqliteStorage::open(&config.storage).await?;
    let events = storage.query(&filter, limit).await?;

    if events.is_empty() {
        println!("no captured events");
    } else {
        for event in &events {
            println!("{}", format_event(event));
        }
        println!("{} event(s)", events.len());
    }

    storage.close().await
}

fn format_event(event: &CapturedEvent) -> String {
    let when = Local
        .timestamp_millis_opt(event.timestamp)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| event.timestamp.to_string());
    let sent = if event.forwarded { "sent" } else { "not-sent" };
    let amount = if event.amount.is_empty() {
        "-"
    } else {
        &event.amount
    };
    let time = if event.time.is_empty() {
        "-"
    } else {
        &event.time
    };
    format!(
        "#{:<5} {}  {:<8} {:>10}  {:>5}  {}  {}",
        event.id, when, sent, amount, time, event.package, event.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_filters() {
        assert_eq!(parse_filter("recent", None, None).unwrap(), DateFilter::Recent);
        assert_eq!(parse_filter("today", None, None).unwrap(), DateFilter::Today);
        assert_eq!(
            parse_filter("yesterday", None, None).unwrap(),
            DateFilter::Yesterday
        );
        assert_eq!(parse_filter("week", None, None).unwrap(), DateFilter::ThisWeek);
    }

    #[test]
    fn custom_range_wins_over_named_filter() {
        assert_eq!(
            parse_filter("today", Some(100), Some(200)).unwrap(),
            DateFilter::Custom {
                start_ms: 100,
                end_ms: 200
            }
        );
    }

    #[test]
    fn rejects_half_open_and_inverted_ranges() {
        assert!(parse_filter("recent", Some(100), None).is_err());
        assert!(parse_filter("recent", None, Some(100)).is_err());
        assert!(parse_filter("recent", Some(200), Some(100)).is_err());
    }

    #[test]
    fn rejects_unknown_filter_name() {
        assert!(parse_filter("tomorrow", None, None).is_err());
    }

    #[test]
    fn format_event_includes_core_fields() {
        let line = format_event(&CapturedEvent {
            id: 3,
            amount: "S/ 25.00".to_string(),
            time: "10:30".to_string(),
            text: "Te han yapeado S/ 25.00 a las 10:30".to_string(),
            timestamp: 1_700_000_000_000,
            forwarded: true,
            package: "com.bcp.innovacxion.yapeapp".to_string(),
        });
        assert!(line.contains("#3"));
        assert!(line.contains("sent"));
        assert!(line.contains("S/ 25.00"));
        assert!(line.contains("10:30"));
    }
}
