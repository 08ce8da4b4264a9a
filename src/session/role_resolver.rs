//! Role resolution for a session record.
//!
//! A role can live in three places. They are tried in a fixed order and the
//! first hit wins:
//!
//! 1. `record.role`
//! 2. `record.user.role`
//! 3. the `role` (or `user.role`) claim inside the bearer token's payload,
//!    read without verifying the signature
//!
//! Nothing here fails: an unreadable token simply contributes no role.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::models::SessionRecord;
use crate::utils::value::{non_empty_str, sanitize_for_log};

const PADDING_OPTIONAL: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Payload segments are base64url; some issuers use the standard alphabet.
const PAYLOAD_ENGINES: [GeneralPurpose; 2] = [
    GeneralPurpose::new(&alphabet::URL_SAFE, PADDING_OPTIONAL),
    GeneralPurpose::new(&alphabet::STANDARD, PADDING_OPTIONAL),
];

type RoleLookup = fn(&SessionRecord) -> Option<String>;

const ROLE_LOOKUPS: [(&str, RoleLookup); 3] = [
    ("record.role", top_level_role),
    ("record.user.role", nested_user_role),
    ("token payload", token_payload_role),
];

#[derive(Debug, thiserror::Error)]
pub enum TokenPayloadError {
    #[error("token has {0} segment(s), expected 3")]
    NotAJwt(usize),
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Resolve the role of a record, trying each lookup in order.
pub fn resolve_role(record: &SessionRecord) -> Option<String> {
    ROLE_LOOKUPS.iter().find_map(|(source, lookup)| {
        let role = lookup(record)?;
        debug!("Resolved role '{}' from {}", sanitize_for_log(&role), source);
        Some(role)
    })
}

/// Decode the claims of a three-segment token without checking its signature.
pub fn decode_token_payload(token: &str) -> Result<Map<String, Value>, TokenPayloadError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenPayloadError::NotAJwt(segments.len()));
    }

    let mut last_error = None;
    let mut bytes = None;
    for engine in &PAYLOAD_ENGINES {
        match engine.decode(segments[1]) {
            Ok(decoded) => {
                bytes = Some(decoded);
                break;
            }
            Err(e) => last_error = Some(e),
        }
    }
    let bytes = match (bytes, last_error) {
        (Some(bytes), _) => bytes,
        (None, Some(e)) => return Err(e.into()),
        (None, None) => return Err(TokenPayloadError::NotAnObject),
    };

    match serde_json::from_slice::<Value>(&bytes)? {
        Value::Object(claims) => Ok(claims),
        _ => Err(TokenPayloadError::NotAnObject),
    }
}

/// `role`, falling back to `user.role`, of any JSON object.
fn role_of(object: &Map<String, Value>) -> Option<String> {
    object
        .get("role")
        .and_then(non_empty_str)
        .or_else(|| {
            object
                .get("user")
                .and_then(Value::as_object)
                .and_then(|user| user.get("role"))
                .and_then(non_empty_str)
        })
        .map(str::to_string)
}

fn top_level_role(record: &SessionRecord) -> Option<String> {
    record
        .get("role")
        .and_then(non_empty_str)
        .map(str::to_string)
}

fn nested_user_role(record: &SessionRecord) -> Option<String> {
    record
        .get("user")
        .and_then(Value::as_object)
        .and_then(|user| user.get("role"))
        .and_then(non_empty_str)
        .map(str::to_string)
}

fn token_payload_role(record: &SessionRecord) -> Option<String> {
    let token = record.bearer_token()?;
    match decode_token_payload(token) {
        Ok(claims) => role_of(&claims),
        // Opaque tokens are normal; only malformed JWTs are worth a warning.
        Err(TokenPayloadError::NotAJwt(_)) => None,
        Err(e) => {
            warn!("Could not decode role from token payload: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose;
    use serde_json::json;

    fn token_with_payload(payload: &Value) -> String {
        let encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("eyJhbGciOiJIUzI1NiJ9.{}.c2ln", encoded)
    }

    fn record(value: Value) -> SessionRecord {
        SessionRecord::try_from(value).expect("test record should be valid")
    }

    #[test]
    fn test_top_level_role_wins() {
        let token = token_with_payload(&json!({"role": "admin"}));
        let r = record(json!({"token": token, "role": "reader", "user": {"role": "writer"}}));
        assert_eq!(resolve_role(&r).as_deref(), Some("reader"));
    }

    #[test]
    fn test_nested_user_role() {
        let r = record(json!({"id": 1, "user": {"role": "writer"}}));
        assert_eq!(resolve_role(&r).as_deref(), Some("writer"));
    }

    #[test]
    fn test_token_payload_role() {
        let token = token_with_payload(&json!({"role": "writer", "sub": "42"}));
        let r = record(json!({"token": token}));
        assert_eq!(resolve_role(&r).as_deref(), Some("writer"));
    }

    #[test]
    fn test_token_payload_nested_user_role() {
        let token = token_with_payload(&json!({"user": {"id": 7, "role": "admin"}}));
        let r = record(json!({"token": token}));
        assert_eq!(resolve_role(&r).as_deref(), Some("admin"));
    }

    #[test]
    fn test_empty_role_falls_through() {
        let token = token_with_payload(&json!({"role": "writer"}));
        let r = record(json!({"token": token, "role": ""}));
        assert_eq!(resolve_role(&r).as_deref(), Some("writer"));
    }

    #[test]
    fn test_non_string_role_is_ignored() {
        let r = record(json!({"id": 1, "role": 5}));
        assert_eq!(resolve_role(&r), None);
    }

    #[test]
    fn test_padded_and_standard_alphabet_payloads_decode() {
        // "?>" forces '+'/'/' in standard base64 and '-'/'_' in base64url.
        let payload = json!({"role": "writer", "note": "?>?>"}).to_string();
        let standard = general_purpose::STANDARD.encode(&payload);
        let url_safe = general_purpose::URL_SAFE.encode(&payload);

        for segment in [standard, url_safe] {
            let claims = decode_token_payload(&format!("h.{}.s", segment)).unwrap();
            assert_eq!(claims["role"], json!("writer"));
        }
    }

    #[test]
    fn test_malformed_payloads_yield_no_role() {
        for token in ["only.two", "a.b.c.d", "h.!!!.s", "h.bm90IGpzb24.s", "h.WzFd.s"] {
            let r = record(json!({"token": token}));
            assert_eq!(resolve_role(&r), None, "token={token}");
        }
    }

    #[test]
    fn test_decode_errors_are_typed() {
        assert!(matches!(
            decode_token_payload("abc"),
            Err(TokenPayloadError::NotAJwt(1))
        ));
        assert!(matches!(
            decode_token_payload("h.!!!.s"),
            Err(TokenPayloadError::Base64(_))
        ));
        // "not json"
        assert!(matches!(
            decode_token_payload("h.bm90IGpzb24.s"),
            Err(TokenPayloadError::Json(_))
        ));
        // "[1]"
        assert!(matches!(
            decode_token_payload("h.WzFd.s"),
            Err(TokenPayloadError::NotAnObject)
        ));
    }

    #[test]
    fn test_no_token_no_role() {
        let r = record(json!({"id": 3, "email": "x@example.com"}));
        assert_eq!(resolve_role(&r), None);
    }
}
