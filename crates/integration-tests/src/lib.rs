//! Integration tests for the Giftly API server.
//!
//! Every test talks to a running server over HTTP and is `#[ignore]`d by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database and start the server
//! cargo run -p giftly-cli -- migrate
//! cargo run -p giftly-server
//!
//! # Tokens for a guest and an admin profile
//! export GIFTLY_TEST_TOKEN=$(cargo run -q -p giftly-cli -- token issue -e guest@giftly.test)
//! export GIFTLY_ADMIN_TOKEN=$(cargo run -q -p giftly-cli -- token issue -e admin@giftly.test)
//!
//! cargo test -p giftly-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `GIFTLY_BASE_URL` - Server address (default: `http://localhost:3000`)
//! - `GIFTLY_TEST_TOKEN` - Bearer token of a non-admin profile
//! - `GIFTLY_ADMIN_TOKEN` - Bearer token of an admin profile

use reqwest::{Client, RequestBuilder};

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("GIFTLY_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Bearer token of a regular profile, if configured.
#[must_use]
pub fn guest_token() -> Option<String> {
    std::env::var("GIFTLY_TEST_TOKEN").ok().filter(|t| !t.is_empty())
}

/// Bearer token of an admin profile, if configured.
#[must_use]
pub fn admin_token() -> Option<String> {
    std::env::var("GIFTLY_ADMIN_TOKEN").ok().filter(|t| !t.is_empty())
}

/// Shared HTTP client.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialised.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// `GET {base_url}{path}`.
#[must_use]
pub fn get(client: &Client, path: &str) -> RequestBuilder {
    client.get(format!("{}{path}", base_url()))
}

/// `POST {base_url}{path}`.
#[must_use]
pub fn post(client: &Client, path: &str) -> RequestBuilder {
    client.post(format!("{}{path}", base_url()))
}
