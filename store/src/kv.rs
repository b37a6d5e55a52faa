//! # Storage traits — plain and encrypted tiers
//!
//! The session layer persists through two genuinely separate stores with separate
//! failure modes:
//!
//! | Trait | Tier | Semantics |
//! |-------|------|-----------|
//! | [`KeyValueStore`] | plain | Batched string-only `multi_set` / `multi_get` / `multi_remove`. |
//! | [`SecretStore`] | encrypted | Single-item `set_item` / `get_item` / `delete_item`; engaged only in production builds. |
//!
//! Removing or deleting a key that was never written is not an error. Write
//! failures are real errors and must reach the caller — in particular the
//! encrypted tier, where a silent failure would leave the session unrecoverable
//! after an app restart.
//!
//! Implementations live in sibling modules ([`crate::memory`], [`crate::file_store`]).

use thiserror::Error;

/// Failure from either storage tier.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no se pudo leer del almacenamiento: {0}")]
    Read(String),
    #[error("no se pudo escribir en el almacenamiento: {0}")]
    Write(String),
    #[error("almacenamiento seguro no disponible: {0}")]
    Secure(String),
}

/// Async interface over the plain key-value tier.
pub trait KeyValueStore {
    fn multi_set(
        &self,
        pairs: &[(&str, String)],
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn multi_get(
        &self,
        keys: &[&str],
    ) -> impl std::future::Future<Output = Result<Vec<Option<String>>, StoreError>>;
    fn multi_remove(
        &self,
        keys: &[&str],
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// Async interface over the encrypted secret tier.
pub trait SecretStore {
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn get_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>>;
    fn delete_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}
