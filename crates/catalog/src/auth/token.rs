//! Opaque session tokens.
//!
//! A token is the standard base64 encoding of `{user_id}:{username}:{issued_at_ms}`.
//! It is neither signed nor expiring: anyone who can read a token can mint
//! another for a different user, and verification only checks that the
//! id/username pair still names a stored user. Existing clients depend on
//! this exact shape.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::store::UserId;

/// The identity a token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub username: String,
}

/// Encode a token for `user_id`/`username` issued at `issued_at_ms`.
pub fn issue(user_id: UserId, username: &str, issued_at_ms: i64) -> String {
    STANDARD.encode(format!("{}:{}:{}", user_id, username, issued_at_ms))
}

/// Decode a token. Returns `None` if it is not base64, not UTF-8, has
/// fewer than two `:`-separated parts, or its first part is not an id.
pub fn decode(token: &str) -> Option<TokenClaims> {
    let bytes = STANDARD.decode(token.trim()).ok()?;
    let payload = String::from_utf8(bytes).ok()?;

    let mut parts = payload.split(':');
    let user_id = parts.next()?.parse().ok()?;
    let username = parts.next()?.to_string();

    Some(TokenClaims { user_id, username })
}
