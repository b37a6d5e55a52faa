//! # Filesystem-backed session storage
//!
//! [`FileStore`] persists both storage tiers to the local filesystem so a session
//! survives app restarts on desktop and mobile platforms.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── plain/
//! │   └── <key>              # value bytes, one file per key
//! └── secret/
//!     └── <key>              # encrypted tier (OS-level file protection)
//! ```
//!
//! Use `dirs::data_dir()`-style platform directories for `base_dir`; the store
//! itself only cares that the path is writable.

use std::path::PathBuf;

use crate::kv::{KeyValueStore, SecretStore, StoreError};

/// Filesystem-backed store for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn plain_dir(&self) -> PathBuf {
        self.base.join("plain")
    }

    fn secret_dir(&self) -> PathBuf {
        self.base.join("secret")
    }

    fn plain_path(&self, key: &str) -> PathBuf {
        self.plain_dir().join(key)
    }

    fn secret_path(&self, key: &str) -> PathBuf {
        self.secret_dir().join(key)
    }

    /// Delete everything this store ever wrote.
    pub fn delete_all(base: &std::path::Path) {
        let _ = std::fs::remove_dir_all(base.join("plain"));
        let _ = std::fs::remove_dir_all(base.join("secret"));
    }
}

fn write_file(path: PathBuf, value: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Write(e.to_string()))?;
    }
    std::fs::write(path, value).map_err(|e| StoreError::Write(e.to_string()))
}

impl KeyValueStore for FileStore {
    async fn multi_set(&self, pairs: &[(&str, String)]) -> Result<(), StoreError> {
        for (key, value) in pairs {
            write_file(self.plain_path(key), value)?;
        }
        Ok(())
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<Option<String>>, StoreError> {
        Ok(keys
            .iter()
            .map(|k| std::fs::read_to_string(self.plain_path(k)).ok())
            .collect())
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            // A key that was never written has no file; that is not an error.
            let _ = std::fs::remove_file(self.plain_path(key));
        }
        Ok(())
    }
}

impl SecretStore for FileStore {
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        write_file(self.secret_path(key), value).map_err(|e| StoreError::Secure(e.to_string()))
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(std::fs::read_to_string(self.secret_path(key)).ok())
    }

    async fn delete_item(&self, key: &str) -> Result<(), StoreError> {
        let _ = std::fs::remove_file(self.secret_path(key));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("registrack_test_{}", std::process::id()));
        FileStore::delete_all(&dir);

        let store = FileStore::new(dir.clone());
        store
            .multi_set(&[("token", "abc".into()), ("usuario", "{}".into())])
            .await
            .unwrap();
        store.set_item("authToken", "abc").await.unwrap();

        // Re-open from the same directory
        let store2 = FileStore::new(dir.clone());
        let values = store2.multi_get(&["token", "usuario"]).await.unwrap();
        assert_eq!(
            values,
            vec![Some("abc".to_string()), Some("{}".to_string())]
        );
        assert_eq!(
            store2.get_item("authToken").await.unwrap(),
            Some("abc".to_string())
        );

        // Cleanup
        FileStore::delete_all(&dir);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let dir = std::env::temp_dir().join(format!("registrack_test_rm_{}", std::process::id()));
        let store = FileStore::new(dir.clone());

        store.multi_remove(&["nope"]).await.unwrap();
        store.delete_item("nope").await.unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }
}
