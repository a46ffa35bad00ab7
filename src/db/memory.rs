//! Session-only storage

use super::LocalStorage;
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory [`LocalStorage`], lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl LocalStorage for MemoryStorage {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_items(&self, keys: &[&str]) -> Result<()> {
        let mut items = self.items.write();
        for key in keys {
            items.remove(*key);
        }
        Ok(())
    }
}
