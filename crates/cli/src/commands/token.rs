//! Access token commands.
//!
//! # Usage
//!
//! ```bash
//! giftly token issue -e host@example.com --days 30
//! ```
//!
//! # Environment Variables
//!
//! - `GIFTLY_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//! - `GIFTLY_TOKEN_PEPPER` - Must match the server's pepper

use chrono::{Days, Utc};
use secrecy::ExposeSecret;
use thiserror::Error;

use giftly_core::{Email, EmailError};
use giftly_server::config::{ConfigError, GiftlyConfig};
use giftly_server::db::{ProfileRepository, RepositoryError, TokenRepository, create_pool};
use giftly_server::services::tokens::{generate_token, hash_token};

/// Default token lifetime.
pub const DEFAULT_DAYS: u32 = 30;

/// Longest token lifetime the CLI will issue.
pub const MAX_DAYS: u32 = 365;

/// Errors that can occur while issuing a token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Token lifetime must be between 1 and {MAX_DAYS} days")]
    InvalidLifetime,

    #[error("No profile with email: {0}")]
    ProfileNotFound(Email),

    #[error("Profile is disabled: {0}")]
    ProfileDisabled(Email),

    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),
}

/// Issue a bearer token for the profile with `email`, valid for `days`.
///
/// The token is printed once to stdout; only its hash is stored.
///
/// # Errors
///
/// Returns `TokenError` for bad input, unknown or disabled profiles, and
/// database failures.
pub async fn issue(email: &str, days: u32) -> Result<(), TokenError> {
    let email = Email::parse(email)?;
    if !(1..=MAX_DAYS).contains(&days) {
        return Err(TokenError::InvalidLifetime);
    }

    let config = GiftlyConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let profile = ProfileRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| TokenError::ProfileNotFound(email.clone()))?;
    if profile.disabled {
        return Err(TokenError::ProfileDisabled(email));
    }

    let token = generate_token();
    let expires_at = Utc::now()
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or(TokenError::InvalidLifetime)?;
    let token_id = TokenRepository::new(&pool)
        .create(
            profile.id,
            &hash_token(token.expose_secret(), &config.token_pepper),
            expires_at,
        )
        .await?;

    tracing::info!(
        token_id = %token_id,
        profile_id = %profile.id,
        role = %profile.role,
        %expires_at,
        "Access token issued"
    );

    #[allow(clippy::print_stdout)]
    {
        println!("{}", token.expose_secret());
    }

    Ok(())
}
