//! In-memory `BalanceStore` used by the test suite.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{BalanceStore, DeleteOutcome};
use crate::{
    error::AppError,
    models::{
        balance::{Balance, NewBalance, UpdateBalanceRequest},
        list::Page,
        payment::Payment,
    },
};

#[derive(Default)]
struct State {
    /// Insertion order, oldest first
    balances: Vec<Balance>,
    payments: Vec<Payment>,
}

#[derive(Default)]
pub struct MemoryBalanceStore {
    state: Mutex<State>,
}

impl MemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a payment drawn from `balance_id`.
    pub fn add_payment(&self, balance_id: Uuid, amount: i64) -> Uuid {
        let payment = Payment {
            id: Uuid::new_v4(),
            balance_id,
            amount,
            created_at: Utc::now(),
        };
        let id = payment.id;
        self.state.lock().unwrap().payments.push(payment);
        id
    }
}

fn name_matches(balance: &Balance, search: Option<&str>) -> bool {
    search.is_none_or(|term| balance.name.contains(term))
}

#[async_trait]
impl BalanceStore for MemoryBalanceStore {
    async fn create(&self, balance: NewBalance) -> Result<Balance, AppError> {
        let now = Utc::now();
        let row = Balance {
            id: balance.id,
            user_id: balance.user_id,
            name: balance.name,
            description: balance.description,
            initial_value: balance.initial_value,
            remaining_value: balance.remaining_value,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().balances.push(row.clone());
        Ok(row)
    }

    async fn find_many(&self, search: Option<&str>, page: Page) -> Result<Vec<Balance>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .balances
            .iter()
            .rev()
            .filter(|b| name_matches(b, search))
            .skip(page.skip as usize)
            .take(page.take as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, search: Option<&str>) -> Result<i64, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.balances.iter().filter(|b| name_matches(b, search)).count() as i64)
    }

    async fn find_unique(&self, id: Uuid) -> Result<Option<Balance>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.balances.iter().find(|b| b.id == id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: UpdateBalanceRequest,
    ) -> Result<Option<Balance>, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(balance) = state.balances.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            balance.name = name;
        }
        if let Some(description) = patch.description {
            balance.description = description;
        }
        if let Some(initial_value) = patch.initial_value {
            balance.initial_value = initial_value;
        }
        if let Some(remaining_value) = patch.remaining_value {
            balance.remaining_value = remaining_value;
        }
        balance.updated_at = Utc::now();

        Ok(Some(balance.clone()))
    }

    async fn delete_unless_linked(&self, id: Uuid) -> Result<DeleteOutcome, AppError> {
        let mut state = self.state.lock().unwrap();
        let Some(index) = state.balances.iter().position(|b| b.id == id) else {
            return Ok(DeleteOutcome::NotFound);
        };

        if let Some(payment) = state.payments.iter().find(|p| p.balance_id == id) {
            return Ok(DeleteOutcome::Linked {
                payment_id: payment.id,
            });
        }

        state.balances.remove(index);
        Ok(DeleteOutcome::Deleted)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
