//! Promo validation at checkout.
//!
//! Registry checkouts may mix vendors, so any promo can apply. Shop checkouts
//! belong to a single vendor and a promo owned by another vendor is rejected.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use giftly_core::VendorId;
use giftly_core::promo::{CartLine, PromoCode, PromoContext, PromoValidation, evaluate_promo};

use crate::db::PromoRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Promo validation request body.
#[derive(Debug, Default, Deserialize)]
pub struct ValidatePromoRequest {
    #[serde(default)]
    pub code: Option<String>,
    /// Shop checkouts only.
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub items: Vec<CartLine>,
}

/// Which checkout a validation request comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkout {
    Registry,
    Shop,
}

impl ValidatePromoRequest {
    /// Validate the request shape, returning the parsed code and context vendor.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidPromoRequest` for a missing or malformed code,
    /// or a shop request without `vendor_id`.
    pub fn parse(&self, checkout: Checkout) -> Result<(PromoCode, Option<VendorId>)> {
        let raw = self
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::InvalidPromoRequest("Promo code is required".to_owned()))?;
        let code = PromoCode::parse(raw)
            .map_err(|e| AppError::InvalidPromoRequest(format!("Invalid promo code: {e}")))?;

        let vendor_id = match checkout {
            Checkout::Registry => None,
            Checkout::Shop => Some(self.vendor_id.ok_or_else(|| {
                AppError::InvalidPromoRequest("vendor_id is required".to_owned())
            })?),
        };

        Ok((code, vendor_id))
    }
}

/// `POST /api/promos/validate`
#[instrument(skip_all, fields(code = tracing::field::Empty))]
pub async fn validate_registry(
    State(state): State<AppState>,
    RequireAuth(_profile): RequireAuth,
    body: std::result::Result<Json<ValidatePromoRequest>, JsonRejection>,
) -> Result<Json<PromoValidation>> {
    validate(&state, body, Checkout::Registry).await
}

/// `POST /api/shop/promos/validate`
#[instrument(skip_all, fields(code = tracing::field::Empty))]
pub async fn validate_shop(
    State(state): State<AppState>,
    RequireAuth(_profile): RequireAuth,
    body: std::result::Result<Json<ValidatePromoRequest>, JsonRejection>,
) -> Result<Json<PromoValidation>> {
    validate(&state, body, Checkout::Shop).await
}

async fn validate(
    state: &AppState,
    body: std::result::Result<Json<ValidatePromoRequest>, JsonRejection>,
    checkout: Checkout,
) -> Result<Json<PromoValidation>> {
    let Json(request) = body.map_err(|rejection| {
        AppError::InvalidPromoRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let (code, vendor_id) = request.parse(checkout)?;
    tracing::Span::current().record("code", code.as_str());

    let promo = PromoRepository::new(state.pool())
        .get_by_code(&code)
        .await?
        .ok_or(AppError::PromoNotFound)?;

    let ctx = PromoContext {
        now: Utc::now(),
        vendor_id,
    };
    let discount = evaluate_promo(&promo, &request.items, &ctx).inspect_err(|rejection| {
        tracing::info!(%rejection, "Promo rejected");
    })?;

    tracing::info!(
        total_discount = %discount.total_discount,
        eligible_lines = discount.eligible_line_count,
        "Promo accepted"
    );
    Ok(Json(PromoValidation::accepted(discount)))
}
