// SPDX-FileCopyrightText: 2026 Yaperelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value reads and writes over the `settings` table.

use std::collections::HashMap;

use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// Synchronous read for composing into larger closures (transactions
/// deref to connections, so both work here).
pub(crate) fn read_value(
    conn: &rusqlite::Connection,
    key: &str,
) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .map(Some)
    .or_else(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(other),
    })
}

/// Synchronous upsert counterpart of [`read_value`].
pub(crate) fn write_value(
    conn: &rusqlite::Connection,
    key: &str,
    value: &str,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// The value for `key`, or `None` when unset.
pub async fn get_value(
    db: &Database,
    key: &str,
) -> Result<Option<String>, yaperelay_core::RelayError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| {
            let value = read_value(conn, &key)?;
            Ok(value)
        })
        .await
        .map_err(map_tr_err)
}

/// Upsert a single key.
pub async fn set_value(
    db: &Database,
    key: &str,
    value: &str,
) -> Result<(), yaperelay_core::RelayError> {
    set_many(db, vec![(key.to_string(), value.to_string())]).await
}

/// Upsert several keys in one transaction.
pub async fn set_many(
    db: &Database,
    pairs: Vec<(String, String)>,
) -> Result<(), yaperelay_core::RelayError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for (key, value) in &pairs {
                write_value(&tx, key, value)?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All settings in one read, for snapshot consistency.
pub async fn get_all(db: &Database) -> Result<HashMap<String, String>, yaperelay_core::RelayError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            let mut map = HashMap::new();
            for row in rows {
                let (key, value): (String, String) = row?;
                map.insert(key, value);
            }
            Ok(map)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn open_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.db");
        let db = Database::open(path.to_str().unwrap(), true).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn unset_key_reads_none() {
        let (db, _dir) = open_db().await;
        assert_eq!(get_value(&db, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let (db, _dir) = open_db().await;
        set_value(&db, "service_enabled", "true").await.unwrap();
        assert_eq!(
            get_value(&db, "service_enabled").await.unwrap().as_deref(),
            Some("true")
        );
    }

    #[tokio::test]
    async fn set_overwrites_existing_value() {
        let (db, _dir) = open_db().await;
        set_value(&db, "k", "one").await.unwrap();
        set_value(&db, "k", "two").await.unwrap();
        assert_eq!(get_value(&db, "k").await.unwrap().as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn set_many_writes_all_pairs() {
        let (db, _dir) = open_db().await;
        set_many(
            &db,
            vec![
                ("last_seen_package".to_string(), "com.app".to_string()),
                ("last_seen_text".to_string(), "hola".to_string()),
            ],
        )
        .await
        .unwrap();

        let all = get_all(&db).await.unwrap();
        assert_eq!(all.get("last_seen_package").map(String::as_str), Some("com.app"));
        assert_eq!(all.get("last_seen_text").map(String::as_str), Some("hola"));
    }
}
