//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Identity Errors**: Missing or malformed caller identity
/// - **Resource Errors**: Requested balance not found
/// - **Business Logic Errors**: Deleting a balance that payments still reference
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request did not carry a valid caller identity.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Missing or invalid user identity")]
    Unauthorized,

    /// Requested balance does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Balance not found")]
    BalanceNotFound,

    /// At least one payment references the balance being deleted.
    ///
    /// Returns HTTP 409 Conflict. The message wording is relied on by
    /// existing clients.
    #[error("This user is already linked with a payment")]
    BalanceLinkedToPayment,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `Unauthorized` → 401 Unauthorized
/// - `BalanceNotFound` → 404 Not Found
/// - `BalanceLinkedToPayment` → 409 Conflict
/// - `InvalidRequest` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            AppError::BalanceNotFound => {
                (StatusCode::NOT_FOUND, "balance_not_found", self.to_string())
            }
            AppError::BalanceLinkedToPayment => {
                (StatusCode::CONFLICT, "balance_conflict", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(ref err) => {
                tracing::error!("database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Malformed query strings (e.g. `?page=abc`) get the same JSON envelope
/// as every other client error.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}
