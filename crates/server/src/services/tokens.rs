//! Bearer access tokens.
//!
//! Tokens are 256-bit random values, base64url encoded behind a `gft_`
//! prefix. The database only stores `sha256(pepper ":" token)` in hex, so a
//! leaked table cannot be replayed without the server's pepper.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

/// Prefix carried by every issued token.
pub const TOKEN_PREFIX: &str = "gft_";

/// Generate a fresh random access token.
#[must_use]
pub fn generate_token() -> SecretString {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    SecretString::from(format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes)))
}

/// Hash a presented token with the server pepper.
#[must_use]
pub fn hash_token(token: &str, pepper: &SecretString) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pepper.expose_secret().as_bytes());
    hasher.update(b":");
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// The scheme is case-insensitive; anything that is not a prefixed token
/// is rejected without touching the database.
#[must_use]
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (token.starts_with(TOKEN_PREFIX) && token.len() > TOKEN_PREFIX.len()).then_some(token)
}
