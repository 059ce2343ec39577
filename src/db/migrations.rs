// src/db/migrations.rs
//
// Schema migrations
//
// PRINCIPLES:
// - Migrations are an ordered, append-only list
// - Each pending migration runs in its own transaction with its version row
// - A database written by a newer build is refused, never downgraded

use rusqlite::{params, Connection};

use crate::error::{AppError, AppResult};

/// (version, statements). Never edit a published entry, append a new one.
const MIGRATIONS: &[(i32, &str)] = &[(
    1,
    "
    -- Durable key-value slots; each slot holds one serialized document
    CREATE TABLE IF NOT EXISTS storage_slots (
        slot     TEXT PRIMARY KEY,
        payload  TEXT NOT NULL,
        saved_at TEXT NOT NULL
    );
    ",
)];

const VERSION_TABLE: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
";

/// Highest version this build knows how to apply
pub fn latest_schema_version() -> i32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Bring the schema up to date. Safe to call on every start.
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(VERSION_TABLE)?;

    let current = schema_version(conn)?;
    let latest = latest_schema_version();
    if current > latest {
        return Err(AppError::Other(format!(
            "Database schema {} is newer than supported {}. Update the application.",
            current, latest
        )));
    }

    for (version, statements) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(statements).map_err(|e| {
            AppError::Other(format!("Failed to apply schema migration {}: {}", version, e))
        })?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
            params![version],
        )?;
        tx.commit()?;
        log::info!("applied schema migration {}", version);
    }

    Ok(())
}

/// 0 for a database no migration has touched
pub fn schema_version(conn: &Connection) -> AppResult<i32> {
    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// Runs SQLite's integrity check
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

    if result != "ok" {
        return Err(AppError::Other(format!(
            "Database integrity check failed: {}",
            result
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct DatabaseStats {
    pub size_bytes: i64,
    pub schema_version: i32,
    pub slot_count: i64,
}

pub fn get_database_stats(conn: &Connection) -> AppResult<DatabaseStats> {
    let page_count: i64 = conn.query_row("PRAGMA page_count", [], |row| row.get(0))?;
    let page_size: i64 = conn.query_row("PRAGMA page_size", [], |row| row.get(0))?;
    let slot_count: i64 =
        conn.query_row("SELECT COUNT(*) FROM storage_slots", [], |row| row.get(0))?;

    Ok(DatabaseStats {
        size_bytes: page_count * page_size,
        schema_version: schema_version(conn)?,
        slot_count,
    })
}
