//! Payment model.
//!
//! Payments are owned by the payments module. This service only reads them
//! to decide whether a balance may be deleted.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents a payment record from the database.
///
/// # Database Table
///
/// Maps to the `payments` table. `balance_id` references `balances(id)`
/// with `ON DELETE RESTRICT`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,

    /// Balance this payment is drawn from
    pub balance_id: Uuid,

    /// Amount consumed, in cents
    pub amount: i64,

    pub created_at: DateTime<Utc>,
}
