//! Caller identity middleware.
//!
//! Credentials are verified upstream. The authenticating layer forwards the
//! user id in the `X-User-Id` header; this middleware:
//! 1. Reads and parses the header
//! 2. Injects an `AuthContext` into the request
//! 3. Rejects requests without a valid id with HTTP 401

use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Authentication context attached to requests on `/api` routes.
///
/// Handlers extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    /// Id of the user making the request
    pub user_id: Uuid,
}

/// Resolve the caller from `X-User-Id`.
///
/// # Returns
///
/// - `Ok(Response)` from the next handler when the header holds a UUID
/// - `Err(AppError::Unauthorized)` otherwise
pub async fn identity_middleware(mut request: Request, next: Next) -> Result<Response, AppError> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(AuthContext { user_id });

    Ok(next.run(request).await)
}
