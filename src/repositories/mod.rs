//! Storage abstraction for balances.
//!
//! The service layer talks to a `BalanceStore` trait object so the backing
//! store can be swapped (PostgreSQL in production, in-memory in tests).

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        balance::{Balance, NewBalance, UpdateBalanceRequest},
        list::Page,
    },
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgBalanceStore;

/// Result of a guarded delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// A payment still references the balance; nothing was deleted.
    Linked { payment_id: Uuid },
}

/// Persistence operations the balance service relies on.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// Insert a new balance and return the stored row.
    async fn create(&self, balance: NewBalance) -> Result<Balance, AppError>;

    /// Fetch one page of balances whose name contains `search`.
    /// Newest first.
    async fn find_many(&self, search: Option<&str>, page: Page) -> Result<Vec<Balance>, AppError>;

    /// Count all balances whose name contains `search`.
    async fn count(&self, search: Option<&str>) -> Result<i64, AppError>;

    async fn find_unique(&self, id: Uuid) -> Result<Option<Balance>, AppError>;

    /// Apply the fields present in `patch`.
    /// Returns `None` if the balance does not exist.
    async fn update(
        &self,
        id: Uuid,
        patch: UpdateBalanceRequest,
    ) -> Result<Option<Balance>, AppError>;

    /// Delete the balance unless a payment references it.
    ///
    /// The payment lookup and the delete must be atomic with respect to
    /// concurrent payment inserts.
    async fn delete_unless_linked(&self, id: Uuid) -> Result<DeleteOutcome, AppError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
