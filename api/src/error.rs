//! # Transport-failure classification
//!
//! Every failed call produces exactly one [`ApiClientError`] — there is no
//! secondary wrapping. The classifier distinguishes the cases the UI handles
//! differently:
//!
//! | Case | Signal | UI contract |
//! |------|--------|-------------|
//! | Network | no response received | connectivity message, offer retry |
//! | Rate limit | status 429 | wait-time message from `retryAfterMinutes` body field, else `Retry-After` header (seconds → minutes), else generic throttle text |
//! | Session expired | status 401, or body `codigo == "SESION_EXPIRADA"` | force logout, never retry |
//! | Other HTTP | any other non-2xx | backend-provided message when present |

use serde_json::Value;
use thiserror::Error;

/// Body code the backend uses to signal an expired session on any status.
pub const SESSION_EXPIRED_CODE: &str = "SESION_EXPIRADA";

/// The sole error representation for a failed transport call. Immutable.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiClientError {
    pub message: String,
    pub status: Option<u16>,
    pub is_network_error: bool,
    pub is_session_expired: bool,
    pub retry_after_minutes: Option<u64>,
    pub payload: Option<Value>,
}

impl ApiClientError {
    /// No response was received at all.
    pub fn network(cause: impl std::fmt::Display) -> Self {
        tracing::debug!("network-layer failure: {cause}");
        Self {
            message: "No se pudo conectar con el servidor. Verifica tu conexión a internet."
                .to_string(),
            status: None,
            is_network_error: true,
            is_session_expired: false,
            retry_after_minutes: None,
            payload: None,
        }
    }

    /// Client-side failure before any request was made.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            is_network_error: false,
            is_session_expired: false,
            retry_after_minutes: None,
            payload: None,
        }
    }

    /// Classify an HTTP response the backend rejected.
    pub fn classify(status: u16, retry_after_header: Option<&str>, payload: Option<Value>) -> Self {
        let body = payload.as_ref();

        let retry_after_minutes = if status == 429 {
            body.and_then(|b| b.get("retryAfterMinutes"))
                .and_then(Value::as_u64)
                .or_else(|| {
                    // Header carries seconds; round up so "30s" shows a 1-minute wait.
                    retry_after_header
                        .and_then(|h| h.trim().parse::<u64>().ok())
                        .map(|secs| secs.div_ceil(60).max(1))
                })
        } else {
            None
        };

        let is_session_expired = status == 401
            || body
                .and_then(|b| b.get("codigo"))
                .and_then(Value::as_str)
                .is_some_and(|c| c == SESSION_EXPIRED_CODE);

        let message = if status == 429 {
            match retry_after_minutes {
                Some(min) => {
                    format!("Demasiadas solicitudes. Intenta de nuevo en {min} minutos.")
                }
                None => "Demasiadas solicitudes. Intenta de nuevo más tarde.".to_string(),
            }
        } else if is_session_expired {
            "Tu sesión ha expirado. Inicia sesión nuevamente.".to_string()
        } else {
            body.and_then(backend_message)
                .unwrap_or_else(|| format!("Error del servidor ({status})"))
        };

        Self {
            message,
            status: Some(status),
            is_network_error: false,
            is_session_expired,
            retry_after_minutes,
            payload,
        }
    }

    /// Whether the caller may reasonably retry without re-authenticating.
    pub fn is_retriable(&self) -> bool {
        self.is_network_error || self.retry_after_minutes.is_some()
    }
}

/// Message keys backends have used, in priority order.
const MESSAGE_KEYS: [&str; 3] = ["message", "mensaje", "error"];

fn backend_message(body: &Value) -> Option<String> {
    MESSAGE_KEYS
        .iter()
        .filter_map(|k| body.get(*k)?.as_str())
        .find(|m| !m.is_empty())
        .map(str::to_string)
}
