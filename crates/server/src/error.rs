//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; clients only ever see a JSON body of
//! the form `{"error": "..."}` (promo routes answer `{"valid": false, "error": "..."}`).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use giftly_core::promo::{PromoRejection, PromoValidation};

use crate::db::RepositoryError;

/// Message returned when a promo code does not exist.
pub const PROMO_NOT_FOUND: &str = "Promo code not found";

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or unusable credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Malformed promo validation request.
    #[error("{0}")]
    InvalidPromoRequest(String),

    /// Promo code does not exist.
    #[error("{PROMO_NOT_FOUND}")]
    PromoNotFound,

    /// Promo exists but does not apply to this cart.
    #[error(transparent)]
    PromoRejected(#[from] PromoRejection),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) | Self::PromoNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) | Self::InvalidPromoRequest(_) | Self::PromoRejected(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::InvalidPromoRequest(message) => {
                (status, Json(PromoValidation::rejected(message))).into_response()
            }
            Self::PromoNotFound | Self::PromoRejected(_) => {
                (status, Json(PromoValidation::rejected(self.to_string()))).into_response()
            }
            // Don't expose internal error details to clients
            Self::Database(RepositoryError::NotFound) => {
                error_body(status, "Not found".to_owned())
            }
            Self::Database(_) | Self::Internal(_) => {
                error_body(status, "Internal server error".to_owned())
            }
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => error_body(status, msg),
            Self::RateLimited => error_body(status, "Too many requests".to_owned()),
        }
    }
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the authenticated profile.
pub fn set_sentry_user(profile_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(profile_id.to_string()),
            ..Default::default()
        }));
    });
}
