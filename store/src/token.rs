//! # Client-side token validity
//!
//! A token is three dot-separated segments; the middle one is base64url-encoded
//! JSON that may carry an `exp` claim in Unix seconds. The check here is purely
//! advisory — the backend remains the source of truth for revocation — so a
//! token with no decodable `exp` is treated as non-expiring, while anything
//! structurally broken is treated as invalid rather than panicking.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

fn now_unix_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn decode_claims(token: &str) -> Option<serde_json::Value> {
    let mut parts = token.split('.');
    let (Some(_), Some(claims), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    // Some issuers pad the segment; the url-safe alphabet itself never varies.
    let bytes = URL_SAFE_NO_PAD.decode(claims.trim_end_matches('=')).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.is_object().then_some(value)
}

/// Whether the token is still usable at `now` (Unix seconds).
pub fn is_valid_at(token: &str, now: i64) -> bool {
    let Some(claims) = decode_claims(token) else {
        return false;
    };
    match claims.get("exp").and_then(serde_json::Value::as_i64) {
        // No expiry claim: valid indefinitely, the backend decides.
        None => true,
        Some(exp) => now < exp,
    }
}

/// Whether the token is still usable right now.
pub fn is_valid(token: &str) -> bool {
    is_valid_at(token, now_unix_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fake_jwt(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{body}.firma")
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let token = fake_jwt(&json!({"exp": now_minus(3600)}));
        assert!(!is_valid(&token));
    }

    #[test]
    fn test_future_expiry_is_valid() {
        let token = fake_jwt(&json!({"exp": now_minus(-3600)}));
        assert!(is_valid(&token));
    }

    #[test]
    fn test_missing_exp_is_valid_indefinitely() {
        let token = fake_jwt(&json!({"sub": "u1"}));
        assert!(is_valid(&token));
    }

    #[test]
    fn test_expiry_boundary_is_strict() {
        let token = fake_jwt(&json!({"exp": 1_000}));
        assert!(is_valid_at(&token, 999));
        assert!(!is_valid_at(&token, 1_000));
    }

    #[test]
    fn test_malformed_tokens_are_invalid_without_panic() {
        assert!(!is_valid(""));
        assert!(!is_valid("solo-un-segmento"));
        assert!(!is_valid("a.b"));
        assert!(!is_valid("a.b.c.d"));
        assert!(!is_valid("cabecera.@@no-base64@@.firma"));

        // Decodes but is not JSON
        let basura = URL_SAFE_NO_PAD.encode(b"no json");
        assert!(!is_valid(&format!("h.{basura}.s")));

        // Decodes to JSON that is not an object
        let escalar = URL_SAFE_NO_PAD.encode(b"42");
        assert!(!is_valid(&format!("h.{escalar}.s")));
    }

    fn now_minus(secs: i64) -> i64 {
        super::now_unix_secs() - secs
    }
}
