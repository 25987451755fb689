//! Balance HTTP handlers.
//!
//! This module implements the balance API endpoints:
//! - POST /api/v1/balances - Create a balance
//! - GET /api/v1/balances - List balances (paginated, searchable)
//! - GET /api/v1/balances/{id} - Get a balance
//! - PATCH /api/v1/balances/{id} - Partially update a balance
//! - DELETE /api/v1/balances/{id} - Delete a balance without payments

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::identity::AuthContext,
    models::{
        balance::{BalanceView, CreateBalanceRequest, UpdateBalanceRequest},
        list::{ListQuery, ListResponse},
    },
    services::balance_service::BalanceService,
};

/// Create a new balance owned by the caller.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Travel",
///   "description": "Yearly travel budget",
///   "initialValue": 1000
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the balance with `usedValue` 0
/// - **Error (401)**: missing caller identity
pub async fn create_balance(
    State(service): State<BalanceService>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateBalanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let balance = service.create(auth.user_id, request).await?;

    Ok((StatusCode::CREATED, Json(balance)))
}

/// List balances.
///
/// # Query Parameters
///
/// - `page`: 1-based page number (default 1)
/// - `size`: page length (default 15)
/// - `query`: case-sensitive substring of the name
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "items": [ { "id": "...", "name": "Travel", "usedValue": 0, ... } ],
///   "total": 42
/// }
/// ```
///
/// Unparseable parameters are reported as `invalid_request` (400).
pub async fn list_balances(
    State(service): State<BalanceService>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse<BalanceView>>, AppError> {
    let Query(query) = query?;

    Ok(Json(service.find_all(query).await?))
}

/// Get a balance by id.
///
/// Returns 404 if it does not exist.
pub async fn get_balance(
    State(service): State<BalanceService>,
    Path(balance_id): Path<Uuid>,
) -> Result<Json<BalanceView>, AppError> {
    Ok(Json(service.find_one(balance_id).await?))
}

/// Partially update a balance.
///
/// Only the fields present in the body are changed.
pub async fn update_balance(
    State(service): State<BalanceService>,
    Path(balance_id): Path<Uuid>,
    Json(patch): Json<UpdateBalanceRequest>,
) -> Result<Json<BalanceView>, AppError> {
    Ok(Json(service.update(balance_id, patch).await?))
}

/// Delete a balance.
///
/// # Response
///
/// - **Success (204 No Content)**
/// - **Error (404)**: balance not found
/// - **Error (409)**: a payment references the balance
pub async fn delete_balance(
    State(service): State<BalanceService>,
    Path(balance_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    service.remove(balance_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
