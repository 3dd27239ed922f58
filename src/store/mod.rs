//! Document storage seam.
//!
//! Components never talk to SQLite directly; they go through [`Repository`],
//! which sits on any [`DocumentStore`].

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};

use crate::db::Database;

pub mod repository;

pub use repository::{Repository, CONFIG_KEY, DATA_KEY};

/// Key-value store of whole JSON documents. `save` overwrites atomically.
pub trait DocumentStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, body: &str) -> Result<()>;
}

impl DocumentStore for Database {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_document(key)?.map(|record| {
            log::debug!("loaded {} (saved {})", record.key, record.updated_at);
            record.body
        }))
    }

    fn save(&self, key: &str, body: &str) -> Result<()> {
        self.put_document(key, body)?;
        Ok(())
    }
}

/// Volatile store; contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .documents
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(guard.get(key).cloned())
    }

    fn save(&self, key: &str, body: &str) -> Result<()> {
        let mut guard = self
            .documents
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        guard.insert(key.to_string(), body.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn DocumentStore) {
        assert_eq!(store.load("k").unwrap(), None);
        store.save("k", "one").unwrap();
        store.save("k", "two").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn memory_store_last_write_wins() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn database_store_last_write_wins() {
        exercise(&Database::in_memory().unwrap());
    }
}
