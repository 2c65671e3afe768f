//! Profile repository: the admin user directory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use giftly_core::{Email, ProfileId, ProfileRole};

use super::{RepositoryError, escape_like};

/// A profile as shown in the admin user list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProfileSummary {
    pub id: ProfileId,
    pub email: Email,
    pub display_name: String,
    pub role: ProfileRole,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

/// Filters for [`ProfileRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    /// Only profiles with this role.
    pub role: Option<ProfileRole>,
    /// Case-insensitive substring of email or display name.
    pub search: Option<String>,
}

/// Repository for profile database operations.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List profiles matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProfileFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProfileSummary>, RepositoryError> {
        let pattern = filter.search.as_deref().map(|s| format!("%{}%", escape_like(s)));
        let rows = sqlx::query_as::<_, ProfileSummary>(
            r"
            SELECT id, email, display_name, role, disabled, created_at, last_seen_at
            FROM app.profile
            WHERE ($1::app.profile_role IS NULL OR role = $1)
              AND ($2::text IS NULL OR email ILIKE $2 OR display_name ILIKE $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(filter.role)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Count profiles matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filter: &ProfileFilter) -> Result<i64, RepositoryError> {
        let pattern = filter.search.as_deref().map(|s| format!("%{}%", escape_like(s)));
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM app.profile
            WHERE ($1::app.profile_role IS NULL OR role = $1)
              AND ($2::text IS NULL OR email ILIKE $2 OR display_name ILIKE $2)
            ",
        )
        .bind(filter.role)
        .bind(pattern)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Get a profile by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<ProfileSummary>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileSummary>(
            r"
            SELECT id, email, display_name, role, disabled, created_at, last_seen_at
            FROM app.profile
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
