pub mod config;
pub mod extract;
pub mod models;
pub mod roles;
pub mod session;
pub mod token;

pub mod kv;

mod memory;
pub use memory::MemoryStore;

mod file_store;
pub use file_store::FileStore;

pub use config::{ClientConfig, RuntimeMode};
pub use kv::{KeyValueStore, SecretStore, StoreError};
pub use models::{Capacidades, Permisos, Rol, RolDetalle, Sesion, Usuario};
pub use session::{RestoredSession, SessionError, SessionStore};
