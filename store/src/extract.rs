//! # Session payload extraction
//!
//! Authentication responses have no guaranteed schema: the `{token, user}` pair
//! may sit at the top level or nested under `data`, `payload`, or `result`, and
//! under a handful of historical key names. This module reconciles all of them
//! into one [`SessionPayload`].
//!
//! ## Algorithm
//!
//! 1. Build the ordered candidate list: the raw object itself, then each nested
//!    container from [`NESTED_KEYS`] that is present.
//! 2. **Strict pass** — return the first candidate where a token *and* a user
//!    are found together. Token and user must come from the same candidate;
//!    mixing candidates here could pair a stale token with the wrong user.
//! 3. **Best-effort fallback** — if no candidate is complete, search token and
//!    user independently across all candidates and return whatever was found.
//!
//! Extraction never fails: an unresolved field is simply `None`, and the caller
//! ([`crate::session`]) decides whether that is fatal.

use serde_json::Value;

/// Nested containers searched after the top-level object, in priority order.
pub const NESTED_KEYS: [&str; 3] = ["data", "payload", "result"];

/// Keys that may carry the token, in priority order.
pub const TOKEN_KEYS: [&str; 2] = ["token", "accessToken"];

/// Keys that may carry the user object, in priority order.
pub const USER_KEYS: [&str; 4] = ["usuario", "user", "usuarioData", "userData"];

/// What extraction could resolve. Either half may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionPayload {
    pub token: Option<String>,
    pub usuario: Option<Value>,
}

impl SessionPayload {
    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.usuario.is_some()
    }
}

fn candidates(raw: &Value) -> Vec<&Value> {
    let mut out = vec![raw];
    for key in NESTED_KEYS {
        if let Some(nested) = raw.get(key) {
            if nested.is_object() {
                out.push(nested);
            }
        }
    }
    out
}

fn token_in(candidate: &Value) -> Option<String> {
    TOKEN_KEYS
        .iter()
        .filter_map(|k| candidate.get(*k)?.as_str())
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

fn user_in(candidate: &Value) -> Option<Value> {
    USER_KEYS
        .iter()
        .filter_map(|k| candidate.get(*k))
        .find(|u| u.is_object())
        .cloned()
}

/// Strict pass: the first candidate holding both halves together.
pub(crate) fn extract_strict(raw: &Value) -> Option<SessionPayload> {
    candidates(raw).into_iter().find_map(|c| {
        let token = token_in(c)?;
        let usuario = user_in(c)?;
        Some(SessionPayload {
            token: Some(token),
            usuario: Some(usuario),
        })
    })
}

/// Locate a token and user in an arbitrary authentication response.
pub fn extract(raw: &Value) -> SessionPayload {
    if let Some(payload) = extract_strict(raw) {
        return payload;
    }

    let sources = candidates(raw);
    let payload = SessionPayload {
        token: sources.iter().find_map(|c| token_in(c)),
        usuario: sources.iter().find_map(|c| user_in(c)),
    };
    if payload.token.is_some() || payload.usuario.is_some() {
        tracing::debug!("session payload resolved via best-effort fallback");
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_pair() {
        let raw = json!({"token": "t1", "usuario": {"correo": "a@b.co"}});
        let payload = extract(&raw);
        assert_eq!(payload.token.as_deref(), Some("t1"));
        assert_eq!(payload.usuario.unwrap()["correo"], "a@b.co");
    }

    #[test]
    fn test_nested_pair_under_data() {
        let raw = json!({"data": {"accessToken": "t2", "userData": {"id": 7}}});
        let payload = extract(&raw);
        assert_eq!(payload.token.as_deref(), Some("t2"));
        assert_eq!(payload.usuario.unwrap()["id"], 7);
    }

    #[test]
    fn test_candidate_priority_prefers_top_level() {
        let raw = json!({
            "token": "outer",
            "usuario": {"id": 1},
            "data": {"token": "inner", "usuario": {"id": 2}},
        });
        let payload = extract(&raw);
        assert_eq!(payload.token.as_deref(), Some("outer"));
        assert_eq!(payload.usuario.unwrap()["id"], 1);
    }

    #[test]
    fn test_split_pair_only_resolves_via_fallback() {
        // Token at the top level, user nested: no single candidate is complete,
        // so the strict pass must yield nothing and the fallback pairs them.
        let raw = json!({"token": "t", "data": {"usuario": {"id": 9}}});
        assert_eq!(extract_strict(&raw), None);

        let payload = extract(&raw);
        assert_eq!(payload.token.as_deref(), Some("t"));
        assert_eq!(payload.usuario.unwrap()["id"], 9);
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let payload = extract(&json!({"mensaje": "ok"}));
        assert_eq!(payload, SessionPayload::default());

        let solo_token = extract(&json!({"token": "t"}));
        assert_eq!(solo_token.token.as_deref(), Some("t"));
        assert_eq!(solo_token.usuario, None);
        assert!(!solo_token.is_complete());
    }

    #[test]
    fn test_non_object_user_is_ignored() {
        let payload = extract(&json!({"token": "t", "usuario": "no-es-objeto"}));
        assert_eq!(payload.usuario, None);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let raw = json!({"result": {"token": "t", "user": {"id": 3}}});
        assert_eq!(extract(&raw), extract(&raw));
    }

    #[test]
    fn test_never_panics_on_scalars() {
        for raw in [json!(null), json!(42), json!("texto"), json!([1, 2])] {
            assert_eq!(extract(&raw), SessionPayload::default());
        }
    }
}
