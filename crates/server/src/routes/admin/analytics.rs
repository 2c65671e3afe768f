//! Admin analytics dashboard.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::instrument;

use giftly_core::analytics::{AnalyticsReport, aggregate};

use super::{resolve_window, today};
use crate::db::AnalyticsRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

const MAX_TOP: usize = 100;

/// Analytics query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    /// Ranking length; defaults to `GIFTLY_ANALYTICS_TOP_N`.
    #[serde(default)]
    pub top: Option<usize>,
}

/// Resolve the ranking length.
fn top_n(requested: Option<usize>, default: usize) -> Result<usize> {
    match requested {
        None => Ok(default),
        Some(n) if (1..=MAX_TOP).contains(&n) => Ok(n),
        Some(_) => Err(AppError::BadRequest(format!(
            "top must be between 1 and {MAX_TOP}"
        ))),
    }
}

/// `GET /api/admin/analytics?range=&start=&end=&top=`
#[instrument(skip_all)]
pub async fn report(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    query: std::result::Result<Query<AnalyticsQuery>, QueryRejection>,
) -> Result<Json<AnalyticsReport>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let today = today();
    let window = resolve_window(
        query.range.as_deref(),
        query.start.as_deref(),
        query.end.as_deref(),
        today,
    )?;
    let top = top_n(query.top, state.config().analytics_top_n)?;

    let input = AnalyticsRepository::new(state.pool())
        .load_input(window, today, top)
        .await?;
    let report = aggregate(&input);

    tracing::info!(
        admin = %admin.profile_id,
        start = %window.start,
        end = %window.end,
        orders = report.revenue.order_count,
        "Analytics report built"
    );
    Ok(Json(report))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::routes::test_support::{offline_app, send};

    #[test]
    fn test_top_n_bounds() {
        assert_eq!(top_n(None, 10).unwrap(), 10);
        assert_eq!(top_n(Some(25), 10).unwrap(), 25);
        assert!(top_n(Some(0), 10).is_err());
        assert!(top_n(Some(101), 10).is_err());
    }

    #[test]
    fn test_query_string_parses() {
        let uri: axum::http::Uri = "/api/admin/analytics?range=7d&top=5".parse().unwrap();
        let Query(query) = Query::<AnalyticsQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.range.as_deref(), Some("7d"));
        assert_eq!(query.top, Some(5));
        assert_eq!(query.start, None);
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (status, _) = send(
            offline_app(),
            "GET",
            "/api/admin/analytics?range=7d",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
