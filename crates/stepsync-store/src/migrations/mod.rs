//! Schema migrations.
//!
//! SQL files are embedded with [`include_str!`] and applied in order.
//! The applied version is tracked in `PRAGMA user_version`, and each
//! step runs in its own transaction together with the version bump, so
//! an interrupted migration leaves no partial schema behind.

use rusqlite::Connection;
use tracing::info;

use crate::errors::{Result, StoreError};

struct Migration {
    version: i64,
    label: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    label: "initial schema",
    sql: include_str!("v001_schema.sql"),
}];

/// Bring the database up to the latest schema version.
///
/// Idempotent; returns how many migrations were applied this call.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current = schema_version(conn)?;
    let mut applied = 0;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(version = migration.version, label = migration.label, "applying migration");
        conn.execute_batch(&format!(
            "BEGIN;\n{}\nPRAGMA user_version = {};\nCOMMIT;",
            migration.sql, migration.version
        ))
        .map_err(|e| StoreError::Migration {
            message: format!("migration v{} ({}) failed: {e}", migration.version, migration.label),
        })?;
        applied += 1;
    }
    Ok(applied)
}

/// The schema version currently recorded in the database.
pub fn schema_version(conn: &Connection) -> Result<i64> {
    let version = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StoreError::Migration {
            message: format!("failed to read user_version: {e}"),
        })?;
    Ok(version)
}
