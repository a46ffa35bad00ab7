//! Key-value table backing the dashboard's local storage

use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// Get a stored value
pub fn get_item(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()?;

    Ok(value)
}

/// Insert or replace a value
pub fn set_item(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

/// Remove several keys in a single transaction
pub fn remove_items(conn: &mut Connection, keys: &[&str]) -> Result<()> {
    let tx = conn.transaction()?;
    for key in keys {
        tx.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
    }
    tx.commit()?;
    Ok(())
}

/// List all stored keys
pub fn keys(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT key FROM local_storage ORDER BY key")?;
    let keys = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(keys)
}
