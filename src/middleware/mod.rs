//! HTTP middleware components.
//!
//! Middleware run before route handlers and can attach request context or
//! short-circuit the request.

/// Caller identity forwarded by the upstream authentication layer
pub mod identity;
