//! Catalog search.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::db::catalog::{ProductHit, RegistryHit};
use crate::error::{AppError, Result};
use crate::state::AppState;

const MIN_QUERY_CHARS: usize = 2;
const MAX_QUERY_CHARS: usize = 100;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 50;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Search results grouped by type.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub products: Vec<ProductHit>,
    pub registries: Vec<RegistryHit>,
}

impl SearchQuery {
    /// Trimmed query text and clamped per-group limit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` when the query is shorter than 2 or
    /// longer than 100 characters.
    pub fn normalise(&self) -> Result<(String, i64)> {
        let q = self.q.as_deref().map_or("", str::trim);
        let chars = q.chars().count();
        if chars < MIN_QUERY_CHARS {
            return Err(AppError::BadRequest(format!(
                "Search query must be at least {MIN_QUERY_CHARS} characters"
            )));
        }
        if chars > MAX_QUERY_CHARS {
            return Err(AppError::BadRequest(format!(
                "Search query must be at most {MAX_QUERY_CHARS} characters"
            )));
        }
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Ok((q.to_owned(), limit))
    }
}

/// `GET /api/search?q=&limit=`
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let (q, limit) = query.normalise()?;

    let repo = CatalogRepository::new(state.pool());
    let products = repo.search_products(&q, limit).await?;
    let registries = repo.search_registries(&q, limit).await?;

    Ok(Json(SearchResponse {
        query: q,
        products,
        registries,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::routes::test_support::{offline_app, send};

    fn query(q: Option<&str>, limit: Option<i64>) -> SearchQuery {
        SearchQuery {
            q: q.map(str::to_owned),
            limit,
        }
    }

    #[test]
    fn test_normalise_trims_and_clamps() {
        assert_eq!(
            query(Some("  vase "), None).normalise().unwrap(),
            ("vase".to_owned(), DEFAULT_LIMIT)
        );
        assert_eq!(query(Some("vase"), Some(500)).normalise().unwrap().1, MAX_LIMIT);
        assert_eq!(query(Some("vase"), Some(0)).normalise().unwrap().1, 1);
    }

    #[test]
    fn test_normalise_length_bounds() {
        assert!(query(None, None).normalise().is_err());
        assert!(query(Some(" a "), None).normalise().is_err());
        assert!(query(Some("ab"), None).normalise().is_ok());
        assert!(query(Some(&"x".repeat(100)), None).normalise().is_ok());
        assert!(query(Some(&"x".repeat(101)), None).normalise().is_err());
        // Counted in characters, not bytes
        assert!(query(Some(&"é".repeat(100)), None).normalise().is_ok());
    }

    #[tokio::test]
    async fn test_short_query_is_rejected() {
        let (status, body) = send(offline_app(), "GET", "/api/search?q=a", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Search query must be at least 2 characters");
    }

    #[tokio::test]
    async fn test_bad_limit_is_rejected() {
        let (status, _) =
            send(offline_app(), "GET", "/api/search?q=vase&limit=many", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
