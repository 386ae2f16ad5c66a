//! # Actix Middleware Library
//!
//! Shared middleware components for Civic Sense Actix services
//!
//! ## Modules
//! - `jwt_auth`: Bearer JWT authentication, exposes the caller as `UserId`
//! - `logging`: Request/response logging through `tracing`
//! - `rate_limit`: Per-IP rate limiting on a keyed `governor` limiter

pub mod jwt_auth;
pub mod logging;
pub mod rate_limit;

pub use jwt_auth::{sign_token, AuthError, Claims, JwtAuthMiddleware, UserId};
pub use logging::Logging;
pub use rate_limit::{RateLimitConfig, RateLimitMiddleware};
