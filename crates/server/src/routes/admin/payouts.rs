//! Vendor payout preview.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use tracing::instrument;

use giftly_core::VendorId;
use giftly_core::payout::{PayoutError, PayoutStatement, compute_payout};

use super::{resolve_window, today};
use crate::db::{PayoutRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Payout preview query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PayoutQuery {
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// `GET /api/admin/payouts/preview?vendor_id=&range=&start=&end=`
#[instrument(skip_all)]
pub async fn preview(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    query: std::result::Result<Query<PayoutQuery>, QueryRejection>,
) -> Result<Json<PayoutStatement>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let vendor_id = query
        .vendor_id
        .ok_or_else(|| AppError::BadRequest("vendor_id is required".to_owned()))?;
    let window = resolve_window(
        query.range.as_deref(),
        query.start.as_deref(),
        query.end.as_deref(),
        today(),
    )?;
    let (first, last) = (window.first_day(), window.last_day());

    let inputs = PayoutRepository::new(state.pool())
        .load_inputs(vendor_id, first, last)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("Vendor {vendor_id} not found"))
            }
            other => AppError::Database(other),
        })?;

    let statement = compute_payout(
        &inputs.vendor,
        &inputs.orders,
        &inputs.items,
        &inputs.prior_payouts,
        first,
        last,
    )
    .map_err(|e| match e {
        PayoutError::InvalidCommissionRate(_) => {
            AppError::Internal(format!("vendor {vendor_id}: {e}"))
        }
        PayoutError::InvalidPeriod => AppError::BadRequest(e.to_string()),
    })?;

    tracing::info!(
        admin = %admin.profile_id,
        vendor_id = %vendor_id,
        amount_due = %statement.amount_due,
        "Payout preview built"
    );
    Ok(Json(statement))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::routes::test_support::{offline_app, send};

    #[test]
    fn test_query_string_parses() {
        let uri: axum::http::Uri =
            "/api/admin/payouts/preview?vendor_id=3&start=2026-03-01&end=2026-03-31"
                .parse()
                .unwrap();
        let Query(query) = Query::<PayoutQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.vendor_id, Some(VendorId::new(3)));
        assert_eq!(query.start.as_deref(), Some("2026-03-01"));
        assert_eq!(query.range, None);
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (status, _) = send(
            offline_app(),
            "GET",
            "/api/admin/payouts/preview?vendor_id=3",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
