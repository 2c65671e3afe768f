//! Rate limiting middleware using governor and `tower_governor`.
//!
//! - `promo_rate_limiter`: promo validation, ~30/min per IP (code guessing)
//! - `admin_rate_limiter`: admin reports, ~60/min per IP
//! - `api_rate_limiter`: public lookups, ~100/min per IP
//!
//! [`json_rate_limit_response`] turns the limiter's plain-text 429 into the
//! JSON error body every other failure uses.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use crate::error::AppError;

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor that trusts proxy headers first, then the peer address.
///
/// Order: `CF-Connecting-IP`, first `X-Forwarded-For` hop, `X-Real-IP`,
/// then the socket address recorded by `into_make_service_with_connect_info`.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        client_ip(req).ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Best-effort client IP for a request.
pub fn client_ip<T>(req: &Request<T>) -> Option<IpAddr> {
    let headers = req.headers();
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header("cf-connecting-ip")
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .or_else(|| {
            header("x-forwarded-for")
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
        .or_else(|| header("x-real-ip").and_then(|s| s.trim().parse::<IpAddr>().ok()))
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        })
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Build a limiter replenishing one request every `period_secs`, with `burst`.
///
/// # Panics
///
/// Panics if either argument is zero; callers below only pass positive
/// constants.
fn limiter(period_secs: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(period_secs)
        .burst_size(burst)
        .finish()
        .expect("rate limiter config with positive period and burst is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Promo validation: 1 request every 2 seconds, burst of 10.
#[must_use]
pub fn promo_rate_limiter() -> RateLimiterLayer {
    limiter(2, 10)
}

/// Admin reports: 1 request per second, burst of 30.
#[must_use]
pub fn admin_rate_limiter() -> RateLimiterLayer {
    limiter(1, 30)
}

/// Public lookups (search, shipping cities): 1 request per second, burst of 50.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    limiter(1, 50)
}

/// Replace governor's plain-text 429 with the JSON error body.
///
/// The `retry-after` and `x-ratelimit-*` headers set by the limiter are kept.
pub async fn json_rate_limit_response(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if response.status() != StatusCode::TOO_MANY_REQUESTS || is_json {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut json = AppError::RateLimited.into_response();
    for (name, value) in &parts.headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            json.headers_mut().insert(name.clone(), value.clone());
        }
    }
    tracing::debug!(
        retry_after = parts
            .headers
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok()),
        "Rate limit hit"
    );
    json
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/api/search");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let req = request(&[
            ("x-forwarded-for", "10.0.0.1"),
            ("cf-connecting-ip", "203.0.113.7"),
        ]);
        assert_eq!(client_ip(&req), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_forwarded_for_uses_first_hop() {
        let req = request(&[("x-forwarded-for", "198.51.100.2, 10.0.0.1")]);
        assert_eq!(client_ip(&req), Some("198.51.100.2".parse().unwrap()));
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let mut req = request(&[("x-real-ip", "not an ip")]);
        assert_eq!(client_ip(&req), None);

        let peer: SocketAddr = "192.0.2.10:51234".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(client_ip(&req), Some(peer.ip()));
    }

    #[tokio::test]
    async fn test_plain_429_becomes_json() {
        let plain = Response::builder()
            .status(StatusCode::TOO_MANY_REQUESTS)
            .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .header(header::RETRY_AFTER, "2")
            .body(axum::body::Body::from("Too Many Requests! Wait for 2s"))
            .unwrap();

        let response = json_rate_limit_response(plain).await;

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Too many requests");
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let ok = Response::builder()
            .status(StatusCode::OK)
            .body(axum::body::Body::from("ok"))
            .unwrap();
        let response = json_rate_limit_response(ok).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_burst_exhaustion_returns_json_429() {
        let app = crate::routes::test_support::offline_app();
        let body = Some(r#"{"code": "SPRING10", "items": []}"#);

        for _ in 0..10 {
            let (status, _) = crate::routes::test_support::send(
                app.clone(),
                "POST",
                "/api/promos/validate",
                None,
                body,
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        let (status, json) = crate::routes::test_support::send(
            app,
            "POST",
            "/api/promos/validate",
            None,
            body,
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"], "Too many requests");
    }

    #[test]
    fn test_limiters_build() {
        let _ = promo_rate_limiter();
        let _ = admin_rate_limiter();
        let _ = api_rate_limiter();
    }
}
