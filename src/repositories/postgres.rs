//! PostgreSQL implementation of `BalanceStore`.
//!
//! # Atomicity Guarantees
//!
//! The delete guard runs in a single database transaction. The balance row
//! is locked with `FOR UPDATE` before the payment lookup, which blocks any
//! concurrent payment insert referencing it (the foreign key check needs a
//! key-share lock on the same row). The `ON DELETE RESTRICT` foreign key
//! backs this up at the schema level.

use async_trait::async_trait;
use uuid::Uuid;

use super::{BalanceStore, DeleteOutcome};
use crate::{
    db::DbPool,
    error::AppError,
    models::{
        balance::{Balance, NewBalance, UpdateBalanceRequest},
        list::Page,
        payment::Payment,
    },
};

/// Balance store backed by a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgBalanceStore {
    pool: DbPool,
}

impl PgBalanceStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BalanceStore for PgBalanceStore {
    async fn create(&self, balance: NewBalance) -> Result<Balance, AppError> {
        let balance = sqlx::query_as::<_, Balance>(
            r#"
            INSERT INTO balances (id, user_id, name, description, initial_value, remaining_value)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, description, initial_value, remaining_value, created_at, updated_at
            "#,
        )
        .bind(balance.id)
        .bind(balance.user_id)
        .bind(balance.name)
        .bind(balance.description)
        .bind(balance.initial_value)
        .bind(balance.remaining_value)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn find_many(&self, search: Option<&str>, page: Page) -> Result<Vec<Balance>, AppError> {
        // strpos keeps the match a literal, case-sensitive substring
        let balances = sqlx::query_as::<_, Balance>(
            r#"
            SELECT id, user_id, name, description, initial_value, remaining_value, created_at, updated_at
            FROM balances
            WHERE ($1::text IS NULL OR strpos(name, $1) > 0)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(page.take)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(balances)
    }

    async fn count(&self, search: Option<&str>) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM balances WHERE ($1::text IS NULL OR strpos(name, $1) > 0)",
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn find_unique(&self, id: Uuid) -> Result<Option<Balance>, AppError> {
        let balance = sqlx::query_as::<_, Balance>(
            r#"
            SELECT id, user_id, name, description, initial_value, remaining_value, created_at, updated_at
            FROM balances
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: UpdateBalanceRequest,
    ) -> Result<Option<Balance>, AppError> {
        // NULL parameters leave the column untouched; description is nullable,
        // so whether to overwrite it travels in $6
        let set_description = patch.description.is_some();
        let description = patch.description.flatten();

        let balance = sqlx::query_as::<_, Balance>(
            r#"
            UPDATE balances
            SET name = COALESCE($2, name),
                description = CASE WHEN $6 THEN $3 ELSE description END,
                initial_value = COALESCE($4, initial_value),
                remaining_value = COALESCE($5, remaining_value),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, name, description, initial_value, remaining_value, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(description)
        .bind(patch.initial_value)
        .bind(patch.remaining_value)
        .bind(set_description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(balance)
    }

    async fn delete_unless_linked(&self, id: Uuid) -> Result<DeleteOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM balances WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            tx.rollback().await?;
            return Ok(DeleteOutcome::NotFound);
        }

        let payment = sqlx::query_as::<_, Payment>(
            "SELECT id, balance_id, amount, created_at FROM payments WHERE balance_id = $1 LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(payment) = payment {
            tx.rollback().await?;
            return Ok(DeleteOutcome::Linked {
                payment_id: payment.id,
            });
        }

        sqlx::query("DELETE FROM balances WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DeleteOutcome::Deleted)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
