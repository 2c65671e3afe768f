//! Admin user directory.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use giftly_core::ProfileRole;

use crate::db::ProfileRepository;
use crate::db::profiles::{ProfileFilter, ProfileSummary};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

const DEFAULT_PER_PAGE: u32 = 25;
const MAX_PER_PAGE: u32 = 100;
const MAX_SEARCH_CHARS: usize = 100;

/// User list query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// One page of the user directory.
#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub users: Vec<ProfileSummary>,
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: i64,
}

/// Validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub role: Option<ProfileRole>,
    pub search: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl Listing {
    /// Row offset of the first profile on this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

impl UsersQuery {
    /// Validate filters and pagination.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown role, a zero page or
    /// page size, or an overlong search.
    pub fn listing(&self) -> Result<Listing> {
        let role = match self.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            Some(raw) => Some(
                raw.to_ascii_lowercase()
                    .parse::<ProfileRole>()
                    .map_err(AppError::BadRequest)?,
            ),
            None => None,
        };

        let search = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_owned);
        if search
            .as_ref()
            .is_some_and(|q| q.chars().count() > MAX_SEARCH_CHARS)
        {
            return Err(AppError::BadRequest(format!(
                "q must be at most {MAX_SEARCH_CHARS} characters"
            )));
        }

        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::BadRequest("page starts at 1".to_owned()));
        }
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        if per_page == 0 {
            return Err(AppError::BadRequest("per_page must be positive".to_owned()));
        }

        Ok(Listing {
            role,
            search,
            page,
            per_page: per_page.min(MAX_PER_PAGE),
        })
    }
}

/// `GET /api/admin/all-users?role=&q=&page=&per_page=`
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    query: std::result::Result<Query<UsersQuery>, QueryRejection>,
) -> Result<Json<UsersPage>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let listing = query.listing()?;
    let filter = ProfileFilter {
        role: listing.role,
        search: listing.search.clone(),
    };

    let repo = ProfileRepository::new(state.pool());
    let total = repo.count(&filter).await?;
    let users = repo
        .list(&filter, i64::from(listing.per_page), listing.offset())
        .await?;

    let per_page = i64::from(listing.per_page);
    Ok(Json(UsersPage {
        users,
        page: listing.page,
        per_page: listing.per_page,
        total,
        total_pages: (total + per_page - 1) / per_page,
    }))
}
