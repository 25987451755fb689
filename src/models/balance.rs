//! Balance data models and API request/response types.
//!
//! This module defines:
//! - `Balance`: Database entity representing a balance
//! - `CreateBalanceRequest` / `UpdateBalanceRequest`: request bodies
//! - `NewBalance`: the row the service hands to the store
//! - `BalanceView`: Response body returned to clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Represents a balance record from the database.
///
/// # Database Table
///
/// Maps to the `balances` table. Each balance:
/// - Belongs to one user (via `user_id`)
/// - Stores its amounts in minor units (cents)
///
/// `remaining_value` starts equal to `initial_value` and is consumed by
/// payments elsewhere in the system.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Balance {
    /// Unique identifier, generated when the balance is created
    pub id: Uuid,

    /// Owner of this balance
    pub user_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    /// Amount granted at creation, in cents
    pub initial_value: i64,

    /// Amount not yet consumed by payments, in cents
    pub remaining_value: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a new balance.
///
/// # JSON Example
///
/// ```json
/// {
///   "name": "Travel",
///   "description": "Yearly travel budget",
///   "initialValue": 100000
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBalanceRequest {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub initial_value: i64,
}

/// Request body for a partial update. Absent fields are left unchanged.
///
/// # JSON Example
///
/// ```json
/// {
///   "remainingValue": 40000,
///   "description": null
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBalanceRequest {
    pub name: Option<String>,

    /// `None` leaves the column alone, `Some(None)` clears it
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    pub initial_value: Option<i64>,
    pub remaining_value: Option<i64>,
}

/// Wraps any value that appears in the body, including `null`, in `Some`,
/// so a missing field stays distinguishable from an explicit `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// A fully-formed row ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewBalance {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub initial_value: i64,
    pub remaining_value: i64,
}

impl NewBalance {
    /// Build the row for a freshly created balance owned by `user_id`.
    ///
    /// The whole initial value is still available, so `remaining_value`
    /// starts equal to `initial_value`.
    pub fn new(user_id: Uuid, request: CreateBalanceRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: request.name,
            description: request.description,
            initial_value: request.initial_value,
            remaining_value: request.initial_value,
        }
    }
}

/// Response body for balance endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Travel",
///   "description": null,
///   "initialValue": 1000,
///   "remainingValue": 400,
///   "usedValue": 600
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub initial_value: i64,
    pub remaining_value: i64,

    /// Derived at read time, never stored
    pub used_value: i64,
}

/// Amount already consumed from a balance.
pub fn used_value(initial_value: i64, remaining_value: i64) -> i64 {
    initial_value.saturating_sub(remaining_value)
}

/// Convert a database Balance to the API BalanceView.
///
/// Drops `user_id` and the timestamps, and derives `used_value`.
impl From<Balance> for BalanceView {
    fn from(balance: Balance) -> Self {
        let used_value = used_value(balance.initial_value, balance.remaining_value);
        Self {
            id: balance.id,
            name: balance.name,
            description: balance.description,
            initial_value: balance.initial_value,
            remaining_value: balance.remaining_value,
            used_value,
        }
    }
}
