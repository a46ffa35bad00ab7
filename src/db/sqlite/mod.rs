//! SQLite database module

mod migrations;
mod local_storage;

use super::LocalStorage;
use crate::error::Result;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::Path;

/// SQLite database wrapper
pub struct SqliteDb {
    conn: Mutex<Connection>,
}

impl SqliteDb {
    /// Create new SQLite database connection
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable WAL mode for better concurrent access
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        Self::from_connection(conn)
    }

    /// Create a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Mutex::new(conn),
        };

        // Run migrations
        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        migrations::run_migrations(&conn)
    }

    /// List stored keys
    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        local_storage::keys(&conn)
    }
}

impl LocalStorage for SqliteDb {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();
        local_storage::get_item(&conn, key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        local_storage::set_item(&conn, key, value)
    }

    fn remove_items(&self, keys: &[&str]) -> Result<()> {
        let mut conn = self.conn.lock();
        local_storage::remove_items(&mut conn, keys)
    }
}
