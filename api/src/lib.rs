//! # API crate — REST client core for the Registrack frontends
//!
//! Everything the screens need to talk to the trademark-registration backend,
//! minus the screens themselves. The backend's response shapes drifted across
//! versions, so this crate (together with [`store`]) owns reconciling them into
//! one canonical model.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | JSON transport over `reqwest` with an explicit bearer credential per call |
//! | [`error`] | Classifies transport failures into one [`ApiClientError`] (network / rate-limit / session-expiry) |
//! | [`auth`] | Login and registration-verification endpoints, wire-exact field names |
//! | [`solicitudes`] | Two-shape service-request normalizer, terminal-status model, and request endpoints |
//!
//! Session persistence and authorization live in the [`store`] crate; the usual
//! flow is `auth::login` → `SessionStore::persist` → `roles::is_administrative`
//! gating the management screens.

pub mod auth;
pub mod client;
pub mod error;
pub mod solicitudes;

pub use client::ApiClient;
pub use error::ApiClientError;
pub use solicitudes::{Normalized, Solicitud};

pub use store::{Sesion, SessionStore, Usuario};
