//! SQLite connection and schema management

use std::path::Path;

use anyhow::{Context, Result};
use tokio_rusqlite::Connection;

/// Schema migrations in the order they are applied. The index of a
/// migration plus one is the `user_version` after it runs.
const MIGRATIONS: &[&str] = &[r"
    CREATE TABLE IF NOT EXISTS event (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        date_mode TEXT NOT NULL,
        dates TEXT NOT NULL,
        start_hour INTEGER NOT NULL,
        end_hour INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        CHECK (start_hour < end_hour)
    );

    CREATE TABLE IF NOT EXISTS link (
        event_id TEXT NOT NULL REFERENCES event(id),
        token TEXT NOT NULL UNIQUE,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS participant (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id TEXT NOT NULL REFERENCES event(id),
        username TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        UNIQUE (event_id, username)
    );

    CREATE TABLE IF NOT EXISTS availability (
        participant_id INTEGER NOT NULL REFERENCES participant(id),
        event_id TEXT NOT NULL REFERENCES event(id),
        date_key TEXT NOT NULL,
        slots TEXT NOT NULL,
        updated_at INTEGER NOT NULL,
        PRIMARY KEY (participant_id, event_id, date_key)
    );

    CREATE INDEX IF NOT EXISTS availability_event_idx ON availability(event_id);
"];

/// Open the database at `db_path`, creating parent directories as
/// needed.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create db directory {}", parent.display()))?;
        }
    }
    let db = Connection::open(db_path).await?;
    db.call(|conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Create every table from scratch
pub fn initialize_db(conn: &mut rusqlite::Connection) -> Result<()> {
    migrate_db(conn)
}

/// Apply migrations newer than the database's `user_version`. Each
/// migration runs in its own transaction.
pub fn migrate_db(conn: &mut rusqlite::Connection) -> Result<()> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let applied = usize::try_from(version).unwrap_or(0);
    for (idx, migration) in MIGRATIONS.iter().enumerate().skip(applied) {
        let tx = conn.transaction()?;
        tx.execute_batch(migration)
            .with_context(|| format!("Migration {} failed", idx + 1))?;
        tx.pragma_update(None, "user_version", (idx + 1) as i64)?;
        tx.commit()?;
        tracing::info!("Applied db migration {}", idx + 1);
    }
    Ok(())
}

/// Run pending migrations on an open async connection
pub async fn migrate(db: &Connection) -> Result<()> {
    db.call(|conn| migrate_db(conn).map_err(|err| tokio_rusqlite::Error::Other(err.into())))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_migrates_idempotently() -> Result<()> {
        let mut conn = rusqlite::Connection::open_in_memory()?;
        initialize_db(&mut conn)?;
        migrate_db(&mut conn)?;

        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        assert_eq!(version, MIGRATIONS.len() as i64);

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        for table in ["availability", "event", "link", "participant"] {
            assert!(tables.iter().any(|t| t == table), "missing table {}", table);
        }
        Ok(())
    }
}
