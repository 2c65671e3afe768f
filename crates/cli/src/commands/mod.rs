//! Subcommand implementations.

pub mod migrate;
pub mod report;
pub mod token;

use secrecy::SecretString;

/// Database URL from `GIFTLY_DATABASE_URL`, falling back to `DATABASE_URL`.
pub(crate) fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();
    std::env::var("GIFTLY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
