use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database at `database_url`. `:memory:` opens an in-memory database.
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        let conn = if database_url == ":memory:" {
            Connection::open_in_memory()?
        } else {
            // Create parent directory if it doesn't exist
            if let Some(parent) = Path::new(database_url).parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        log::warn!("Failed to create database directory {:?}: {}", parent, e);
                    }
                }
            }
            Connection::open(database_url)?
        };
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS leetcode_profiles (
                caller_id TEXT PRIMARY KEY,
                leetcode_username TEXT NOT NULL,
                total_solved INTEGER NOT NULL CHECK (total_solved >= 0),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_leetcode_profiles_username ON leetcode_profiles(leetcode_username)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_leetcode_profiles_solved ON leetcode_profiles(total_solved DESC)",
            [],
        )?;

        Ok(())
    }

    /// Lock the connection. A poisoned lock is recovered; every statement is self-contained.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
