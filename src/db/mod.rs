//! Local key-value storage
//!
//! The dashboard persists its state the way a browser persists
//! `localStorage`: string keys mapped to JSON strings. [`sqlite::SqliteDb`]
//! is the durable backend, [`memory::MemoryStorage`] the session-only one.

pub mod sqlite;
pub mod memory;

use crate::error::Result;

/// Durable string key-value storage
pub trait LocalStorage: Send + Sync {
    /// Backend name used in logs
    fn backend(&self) -> &'static str;

    /// Read a value, `None` if the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every listed key in one all-or-nothing step
    fn remove_items(&self, keys: &[&str]) -> Result<()>;
}

pub use memory::MemoryStorage;
pub use sqlite::SqliteDb;
