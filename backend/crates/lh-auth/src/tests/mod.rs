mod resolver;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::Value;

pub(crate) const TEST_SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

/// Signed HS256 token with the given payload
pub(crate) fn signed_token(payload: &Value, secret: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        payload,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// Structurally valid JWT whose signature segment is garbage
pub(crate) fn unsigned_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.not-a-signature", header, body)
}
