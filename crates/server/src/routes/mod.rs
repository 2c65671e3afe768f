//! HTTP route handlers for the API server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Readiness (database reachable)
//!
//! # Checkout (bearer token)
//! POST /api/promos/validate           - Validate a promo for a registry checkout
//! POST /api/shop/promos/validate      - Validate a promo for a single-vendor shop checkout
//!
//! # Public lookups
//! GET  /api/search                    - Products and public registries by name
//! GET  /api/shipping/cities           - Shipping destinations of a country
//!
//! # Admin (bearer token, admin role)
//! GET  /api/admin/all-users           - Paginated profile directory
//! GET  /api/admin/analytics           - Dashboard metrics for a date window
//! GET  /api/admin/payouts/preview     - Payout statement for one vendor
//! ```

pub mod admin;
pub mod health;
pub mod promos;
pub mod search;
pub mod shipping;

use axum::{
    Router,
    http::Request,
    middleware::{from_fn, map_response},
    routing::get,
    routing::post,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    admin_rate_limiter, api_rate_limiter, json_rate_limit_response, promo_rate_limiter,
    request_id_middleware,
};
use crate::state::AppState;

/// Create the promo validation routes router.
pub fn promo_routes() -> Router<AppState> {
    Router::new()
        .route("/promos/validate", post(promos::validate_registry))
        .route("/shop/promos/validate", post(promos::validate_shop))
        .layer(promo_rate_limiter())
}

/// Create the public lookup routes router.
pub fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search::search))
        .route("/shipping/cities", get(shipping::cities))
        .layer(api_rate_limiter())
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/all-users", get(admin::users::list))
        .route("/analytics", get(admin::analytics::report))
        .route("/payouts/preview", get(admin::payouts::preview))
        .layer(admin_rate_limiter())
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest(
            "/api",
            Router::new()
                .merge(promo_routes())
                .merge(lookup_routes())
                .nest("/admin", admin_routes()),
        )
}

/// Build the full application: routes, request IDs and request tracing.
///
/// Sentry layers are added by the binary so tests can drive this router
/// directly.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(map_response(json_rate_limit_response))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        profile_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                        span.record("latency_ms", latency_ms);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::GiftlyConfig;
    use crate::state::AppState;

    /// App over a pool that never connects; only paths that fail before
    /// touching the database can be exercised.
    pub fn offline_app() -> Router {
        let vars: HashMap<&str, &str> = [
            ("GIFTLY_DATABASE_URL", "postgres://giftly@127.0.0.1:1/giftly"),
            ("GIFTLY_TOKEN_PEPPER", "k2P!x9Lq#4vZ@8mT$1wR^6nY&3bH*7cJ"),
        ]
        .into_iter()
        .collect();
        let config =
            GiftlyConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned())).unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://giftly@127.0.0.1:1/giftly")
            .unwrap();
        super::app(AppState::new(config, pool))
    }

    /// Send a request from a fixed client IP and decode the JSON response.
    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", "203.0.113.9");
        if let Some(token) = auth {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }
}
