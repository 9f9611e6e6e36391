//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with `request_id` field)
//! 3. Request ID (fill the span field, echo `x-request-id`)
//! 4. Security headers
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Rate limiting on login/register (governor)
//!
//! Authentication is enforced per handler by the extractors in [`auth`].

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAdmin, RequireAuth, log_in, log_out};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter, json_rate_limit_response};
pub use request_id::{make_request_span, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
