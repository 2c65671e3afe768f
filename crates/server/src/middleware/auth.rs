//! Bearer token authentication extractors.
//!
//! The token is read from the `Authorization` header, hashed with the
//! configured pepper and looked up in `app.access_token`. Requests without a
//! well-formed bearer token are rejected before any database access.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use giftly_core::{ProfileId, ProfileRole};

use crate::db::TokenRepository;
use crate::error::{AppError, set_sentry_user};
use crate::services::tokens::{hash_token, parse_bearer};
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthProfile {
    pub profile_id: ProfileId,
    pub role: ProfileRole,
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(profile): RequireAuth) -> impl IntoResponse {
///     format!("Hello, profile {}!", profile.profile_id)
/// }
/// ```
pub struct RequireAuth(pub AuthProfile);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_bearer)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_owned()))?;

        let hash = hash_token(token, &state.config().token_pepper);
        let owner = TokenRepository::new(state.pool())
            .find_owner(&hash)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_owned()))?;

        set_sentry_user(&owner.profile_id);
        tracing::Span::current().record("profile_id", owner.profile_id.as_i32());

        Ok(Self(AuthProfile {
            profile_id: owner.profile_id,
            role: owner.role,
        }))
    }
}

/// Extractor that requires a valid bearer token belonging to an admin.
///
/// Non-admin callers get 403.
pub struct RequireAdmin(pub AuthProfile);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(profile) = RequireAuth::from_request_parts(parts, state).await?;
        if profile.role != ProfileRole::Admin {
            tracing::warn!(profile_id = %profile.profile_id, "Non-admin called admin route");
            return Err(AppError::Forbidden("Admin access required".to_owned()));
        }
        Ok(Self(profile))
    }
}
