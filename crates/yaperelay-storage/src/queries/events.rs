// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Captured-event queries: insert with retention trim, recency and range
//! reads.

use rusqlite::params;
use yaperelay_core::{CapturedEvent, MAX_EVENTS};

use crate::database::{map_tr_err, Database};

const EVENT_COLUMNS: &str = "id, amount, time, text, timestamp, forwarded, package";

fn row_to_event(row: &rusqlite::Row<'_>) -> Result<CapturedEvent, rusqlite::Error> {
    Ok(CapturedEvent {
        id: row.get(0)?,
        amount: row.get(1)?,
        time: row.get(2)?,
        text: row.get(3)?,
        timestamp: row.get(4)?,
        forwarded: row.get(5)?,
        package: row.get(6)?,
    })
}

/// Insert an event and trim the table back to the retention cap, oldest
/// rows first. Returns the new event's id.
pub async fn insert_event(db: &Database, event: &CapturedEvent) -> Result<i64, yaperelay_core::RelayError> {
    let event = event.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO events (amount, time, text, timestamp, forwarded, package)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    event.amount,
                    event.time,
                    event.text,
                    event.timestamp,
                    event.forwarded,
                    event.package,
                ],
            )?;
            let id = tx.last_insert_rowid();

            let count: i64 = tx.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
            if count > MAX_EVENTS {
                tx.execute(
                    "DELETE FROM events WHERE id IN (
                         SELECT id FROM events ORDER BY timestamp ASC, id ASC LIMIT ?1
                     )",
                    params![count - MAX_EVENTS],
                )?;
            }

            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(map_tr_err)
}

/// Up to `limit` events, newest first.
pub async fn recent_events(
    db: &Database,
    limit: i64,
) -> Result<Vec<CapturedEvent>, yaperelay_core::RelayError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events
                 ORDER BY timestamp DESC, id DESC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], row_to_event)?;
            let mut events = Vec::new();
            for row in rows {
                events.push(row?);
            }
            Ok(events)
        })
        .await
        .map_err(map_tr_err)
}

/// Events with `start_ms <= timestamp <= end_ms`, newest first.
pub async fn events_by_range(
    db: &Database,
    start_ms: i64,
    end_ms: i64,
) -> Result<Vec<CapturedEvent>, yaperelay_core::RelayError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {EVENT_COLUMNS} FROM events
                 WHERE timestamp BETWEEN ?1 AND ?2
                 ORDER BY timestamp DESC, id DESC"
            ))?;
            let rows = stmt.query_map(params![start_ms, end_ms], row_to_event)?;
            let mut events = Vec::new();
            for row in rows {
                events.push(row?);
            }
            Ok(events)
        })
        .await
        .map_err(map_tr_err)
}

/// Number of retained events.
pub async fn count_events(db: &Database) -> Result<i64, yaperelay_core::RelayError> {
    db.connection()
        .call(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}
