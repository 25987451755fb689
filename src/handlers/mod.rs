//! HTTP request handlers (route handlers).
//!
//! Each handler extracts request data, calls the balance service and
//! returns a JSON response or an `AppError`.

/// Balance CRUD endpoints
pub mod balances;
/// Service health endpoint
pub mod health;
