//! # Session persistence
//!
//! [`SessionStore`] owns the canonical `{token, usuario}` session across the two
//! storage tiers. It is the only writer of session keys, so [`SessionStore::clear`]
//! can always return both tiers to a fully-empty state.
//!
//! ## Key layout
//!
//! The token and serialized user are written redundantly under every key a
//! historical reader may look for (see [`TOKEN_KEYS`] / [`USER_KEYS`]). Restore
//! walks the same tables in priority order and takes the first value that works;
//! a user blob that fails to parse is skipped, not fatal.
//!
//! The encrypted tier holds a single item ([`SECRET_TOKEN_KEY`]) and is engaged
//! only in production mode. Write failures there are surfaced, never swallowed:
//! the caller decides whether to proceed session-less.
//!
//! ## Ordering
//!
//! `persist` completes both tiers before returning, so a caller may treat its
//! result as the authoritative in-memory session. Operations are sequenced by
//! the caller's event loop, not by locks; a `clear` racing a stale `persist` or
//! `restore` wins because it reflects the more recent user intent (logout or
//! invalid-token detection).

use serde_json::Value;
use thiserror::Error;

use crate::config::RuntimeMode;
use crate::extract;
use crate::kv::{KeyValueStore, SecretStore, StoreError};
use crate::models::{Sesion, Usuario};
use crate::token;

/// Plain-tier keys the token is written under, in restore priority order.
pub const TOKEN_KEYS: [&str; 2] = ["token", "authToken"];

/// Plain-tier keys the serialized user is written under, in restore priority order.
pub const USER_KEYS: [&str; 3] = ["usuario", "user", "userData"];

/// The single key used in the encrypted tier.
pub const SECRET_TOKEN_KEY: &str = "authToken";

/// Failure establishing or reading a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Extraction found no complete `{token, usuario}` pair.
    #[error("Respuesta de autenticación inválida")]
    InvalidAuthResponse,
    /// The located user value does not decode as a user record.
    #[error("Usuario inválido en la respuesta de autenticación")]
    InvalidUser(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What `restore` could recover. Either half may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestoredSession {
    pub token: Option<String>,
    pub usuario: Option<Usuario>,
}

impl RestoredSession {
    /// Collapse to a session, requiring both halves.
    pub fn into_sesion(self) -> Option<Sesion> {
        match (self.token, self.usuario) {
            (Some(token), Some(usuario)) if !token.is_empty() => Some(Sesion { token, usuario }),
            _ => None,
        }
    }
}

/// Session persistence over a plain tier `P` and an encrypted tier `S`.
#[derive(Clone, Debug)]
pub struct SessionStore<P, S> {
    plain: P,
    secret: S,
    mode: RuntimeMode,
}

impl<P: KeyValueStore, S: SecretStore> SessionStore<P, S> {
    pub fn new(plain: P, secret: S, mode: RuntimeMode) -> Self {
        Self {
            plain,
            secret,
            mode,
        }
    }

    /// Extract the session from a raw authentication response and persist it.
    ///
    /// Fails with [`SessionError::InvalidAuthResponse`] when no complete pair is
    /// found — a partial pair is never silently persisted. Idempotent: the same
    /// payload always yields the same stored state.
    pub async fn persist(&self, raw: &Value) -> Result<Sesion, SessionError> {
        let payload = extract::extract(raw);
        let (Some(token), Some(user_value)) = (payload.token, payload.usuario) else {
            return Err(SessionError::InvalidAuthResponse);
        };

        let usuario: Usuario =
            serde_json::from_value(user_value.clone()).map_err(SessionError::InvalidUser)?;

        // The raw user value is stored as-is so fields this client does not
        // model yet survive a roundtrip.
        let user_json = user_value.to_string();
        let mut pairs: Vec<(&str, String)> = Vec::new();
        for key in TOKEN_KEYS {
            pairs.push((key, token.clone()));
        }
        for key in USER_KEYS {
            pairs.push((key, user_json.clone()));
        }
        self.plain.multi_set(&pairs).await.map_err(SessionError::Store)?;

        if self.mode.is_production() {
            self.secret
                .set_item(SECRET_TOKEN_KEY, &token)
                .await
                .map_err(SessionError::Store)?;
        }

        Ok(Sesion { token, usuario })
    }

    /// Read back whatever session material the tiers hold.
    pub async fn restore(&self) -> Result<RestoredSession, StoreError> {
        let mut keys: Vec<&str> = TOKEN_KEYS.to_vec();
        keys.extend(USER_KEYS);
        let values = self.plain.multi_get(&keys).await?;
        let (token_values, user_values) = values.split_at(TOKEN_KEYS.len());

        let mut token = token_values
            .iter()
            .flatten()
            .find(|t| !t.is_empty())
            .cloned();
        if token.is_none() && self.mode.is_production() {
            token = self.secret.get_item(SECRET_TOKEN_KEY).await?;
        }

        let mut usuario = None;
        for (key, value) in USER_KEYS.iter().zip(user_values) {
            let Some(value) = value else { continue };
            match serde_json::from_str::<Usuario>(value) {
                Ok(parsed) => {
                    usuario = Some(parsed);
                    break;
                }
                Err(e) => {
                    tracing::warn!("stored user under '{key}' is unparseable, trying next: {e}");
                }
            }
        }

        Ok(RestoredSession { token, usuario })
    }

    /// Startup path: restore, then discard anything expired or incomplete.
    ///
    /// A token past its expiry, or a lone token/user half, is wiped from both
    /// tiers so the app starts from a clean logged-out state.
    pub async fn restore_valid(&self) -> Result<Option<Sesion>, StoreError> {
        let restored = self.restore().await?;
        if restored == RestoredSession::default() {
            return Ok(None);
        }

        let valid = restored
            .token
            .as_deref()
            .is_some_and(token::is_valid);
        match restored.into_sesion() {
            Some(sesion) if valid => Ok(Some(sesion)),
            _ => {
                tracing::debug!("stored session expired or incomplete, clearing");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    /// Remove every key this module ever wrote, from both tiers.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut keys: Vec<&str> = TOKEN_KEYS.to_vec();
        keys.extend(USER_KEYS);
        self.plain.multi_remove(&keys).await?;
        self.secret.delete_item(SECRET_TOKEN_KEY).await?;
        Ok(())
    }
}
