//! HTTP middleware stack for the API server.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (add unique ID to each request)
//! 4. JSON bodies for rate-limited responses
//! 5. Rate limiting (governor, per client IP, per route group)
//!
//! Authentication is done per handler by the [`RequireAuth`] and
//! [`RequireAdmin`] extractors.

pub mod auth;
pub mod rate_limit;
pub mod request_id;

pub use auth::{AuthProfile, RequireAdmin, RequireAuth};
pub use rate_limit::{
    admin_rate_limiter, api_rate_limiter, json_rate_limit_response, promo_rate_limiter,
};
pub use request_id::request_id_middleware;
