//! `SQLite` connection pooling.
//!
//! Every pooled connection is opened with the same pragma set: WAL
//! journaling, `foreign_keys = ON` (the schema leans on cascading
//! deletes and reference checks), and a busy timeout so concurrent
//! writers back off instead of failing with `SQLITE_BUSY`.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::errors::Result;

/// Pool of `SQLite` connections.
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// One checked-out connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pool sizing and pragma knobs.
#[derive(Clone, Debug)]
pub struct ConnectionConfig {
    /// Maximum pool size (default: 8).
    pub pool_size: u32,
    /// Busy timeout in milliseconds (default: 30000).
    pub busy_timeout_ms: u32,
    /// Page cache size in KiB (default: 4096).
    pub cache_size_kib: i64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            pool_size: 8,
            busy_timeout_ms: 30_000,
            cache_size_kib: 4096,
        }
    }
}

impl ConnectionConfig {
    fn pragma_batch(&self) -> String {
        format!(
            "PRAGMA journal_mode = WAL;\n\
             PRAGMA synchronous = NORMAL;\n\
             PRAGMA foreign_keys = ON;\n\
             PRAGMA busy_timeout = {};\n\
             PRAGMA cache_size = -{};",
            self.busy_timeout_ms, self.cache_size_kib
        )
    }
}

fn build_pool(manager: SqliteConnectionManager, max_size: u32) -> Result<ConnectionPool> {
    let pool = Pool::builder()
        .max_size(max_size)
        .connection_timeout(std::time::Duration::from_secs(5))
        .build(manager)?;
    Ok(pool)
}

/// Open a file-backed pool.
pub fn new_file(path: &str, config: &ConnectionConfig) -> Result<ConnectionPool> {
    let pragmas = config.pragma_batch();
    let manager = SqliteConnectionManager::file(path)
        .with_init(move |conn: &mut Connection| conn.execute_batch(&pragmas));
    build_pool(manager, config.pool_size)
}

/// Open an in-memory pool for tests and ephemeral runs.
///
/// Capped at a single connection: every new `:memory:` connection opens
/// its own empty database, so a larger pool would hand out blank ones.
pub fn new_in_memory(config: &ConnectionConfig) -> Result<ConnectionPool> {
    let pragmas = config.pragma_batch();
    let manager = SqliteConnectionManager::memory()
        .with_init(move |conn: &mut Connection| conn.execute_batch(&pragmas));
    build_pool(manager, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_pool_answers_queries() {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        let conn = pool.get().unwrap();
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0)).unwrap();
        assert_eq!(one, 1);
    }

    #[test]
    fn pragmas_applied_on_open() {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        let conn = pool.get().unwrap();
        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
        let busy: i64 = conn
            .query_row("PRAGMA busy_timeout", [], |row| row.get(0))
            .unwrap();
        assert_eq!(busy, 30_000);
    }

    #[test]
    fn file_pool_journals_in_wal_and_shares_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let pool = new_file(path.to_str().unwrap(), &ConnectionConfig::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            let mode: String = conn
                .query_row("PRAGMA journal_mode", [], |row| row.get(0))
                .unwrap();
            assert_eq!(mode, "wal");
            conn.execute_batch("CREATE TABLE t (x INTEGER); INSERT INTO t VALUES (7);")
                .unwrap();
        }
        let conn = pool.get().unwrap();
        let x: i64 = conn
            .query_row("SELECT x FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(x, 7);
    }
}
