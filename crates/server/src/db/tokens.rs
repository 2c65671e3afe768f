//! Access token repository.
//!
//! Only the peppered SHA-256 hash of a token is stored; see
//! [`crate::services::tokens`].

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use giftly_core::{AccessTokenId, ProfileId, ProfileRole};

use super::RepositoryError;

/// The profile a presented bearer token resolves to.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TokenOwner {
    pub profile_id: ProfileId,
    pub role: ProfileRole,
}

/// Repository for access token database operations.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a token hash to its owner.
    ///
    /// Expired tokens and tokens of disabled profiles resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_owner(
        &self,
        token_hash: &str,
    ) -> Result<Option<TokenOwner>, RepositoryError> {
        let owner = sqlx::query_as::<_, TokenOwner>(
            r"
            SELECT p.id AS profile_id, p.role
            FROM app.access_token t
            JOIN app.profile p ON p.id = t.profile_id
            WHERE t.token_hash = $1
              AND t.expires_at > NOW()
              AND NOT p.disabled
            ",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(owner)
    }

    /// Store a new token hash for `profile_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the hash already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        profile_id: ProfileId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AccessTokenId, RepositoryError> {
        let id: AccessTokenId = sqlx::query_scalar(
            r"
            INSERT INTO app.access_token (profile_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(profile_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("token hash already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(id)
    }
}
