//! Balance service - business logic for balances.
//!
//! This service handles:
//! - Creating balances with their full value available
//! - Paginated, searchable listing
//! - Partial updates
//! - Guarded deletion (blocked while payments reference the balance)
//! - Rendering persisted rows into `BalanceView`s

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        balance::{Balance, BalanceView, CreateBalanceRequest, NewBalance, UpdateBalanceRequest},
        list::{ListQuery, ListResponse},
    },
    repositories::{BalanceStore, DeleteOutcome},
};

/// Orchestrates the balance store and shapes its rows for clients.
///
/// Cheap to clone; the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct BalanceService {
    store: Arc<dyn BalanceStore>,
}

impl BalanceService {
    pub fn new(store: Arc<dyn BalanceStore>) -> Self {
        Self { store }
    }

    /// Create a balance owned by `user_id`.
    ///
    /// A fresh id is generated and `remaining_value` starts equal to
    /// `initial_value`.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateBalanceRequest,
    ) -> Result<BalanceView, AppError> {
        let balance = self.store.create(NewBalance::new(user_id, request)).await?;

        tracing::info!(balance_id = %balance.id, %user_id, "balance created");

        Ok(render_view(balance))
    }

    /// List balances whose name contains `query.query`.
    ///
    /// `total` counts every matching row, not just the returned page. The
    /// page and the count are read separately, so they can disagree under
    /// concurrent writes.
    pub async fn find_all(&self, query: ListQuery) -> Result<ListResponse<BalanceView>, AppError> {
        let page = query.page()?;
        let search = query.search();

        let balances = self.store.find_many(search, page).await?;
        let total = self.store.count(search).await?;

        tracing::debug!(
            take = page.take,
            skip = page.skip,
            total,
            "listed balances"
        );

        Ok(ListResponse {
            items: balances.into_iter().map(render_view).collect(),
            total,
        })
    }

    /// Get a balance by id.
    ///
    /// # Errors
    ///
    /// - `BalanceNotFound`: no balance with this id
    pub async fn find_one(&self, id: Uuid) -> Result<BalanceView, AppError> {
        let balance = self
            .store
            .find_unique(id)
            .await?
            .ok_or(AppError::BalanceNotFound)?;

        Ok(render_view(balance))
    }

    /// Apply a partial update.
    ///
    /// Values are stored as given; `remaining_value` is not checked against
    /// `initial_value`.
    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateBalanceRequest,
    ) -> Result<BalanceView, AppError> {
        let balance = self
            .store
            .update(id, patch)
            .await?
            .ok_or(AppError::BalanceNotFound)?;

        tracing::info!(balance_id = %id, "balance updated");

        Ok(render_view(balance))
    }

    /// Delete a balance that no payment references.
    ///
    /// # Errors
    ///
    /// - `BalanceLinkedToPayment`: a payment references the balance
    /// - `BalanceNotFound`: no balance with this id
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        match self.store.delete_unless_linked(id).await? {
            DeleteOutcome::Deleted => {
                tracing::info!(balance_id = %id, "balance deleted");
                Ok(())
            }
            DeleteOutcome::NotFound => Err(AppError::BalanceNotFound),
            DeleteOutcome::Linked { payment_id } => {
                tracing::info!(balance_id = %id, %payment_id, "balance delete blocked by payment");
                Err(AppError::BalanceLinkedToPayment)
            }
        }
    }

    /// Check that the backing store is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

fn render_view(balance: Balance) -> BalanceView {
    BalanceView::from(balance)
}
