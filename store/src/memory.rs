use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::kv::{KeyValueStore, SecretStore, StoreError};

/// In-memory store for testing and desktop fallback.
///
/// Implements both tiers over separate maps so tests can observe that the plain
/// and encrypted stores really are distinct.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    secrets: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held in the plain tier.
    pub fn plain_len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Number of keys currently held in the secret tier.
    pub fn secret_len(&self) -> usize {
        self.secrets.lock().unwrap().len()
    }
}

impl KeyValueStore for MemoryStore {
    async fn multi_set(&self, pairs: &[(&str, String)]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        for (key, value) in pairs {
            entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(keys.iter().map(|k| entries.get(*k).cloned()).collect())
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

impl SecretStore for MemoryStore {
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.secrets
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.secrets.lock().unwrap().get(key).cloned())
    }

    async fn delete_item(&self, key: &str) -> Result<(), StoreError> {
        self.secrets.lock().unwrap().remove(key);
        Ok(())
    }
}
