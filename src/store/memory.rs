//! In-memory [`Store`] backend for tests and embedders without a database.
//!
//! A single mutex guards all tables, which trivially satisfies the atomicity
//! contract of [`Store::commit_materialization`]: the guard check and the
//! three writes happen under one lock acquisition.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::Result;
use crate::ledger::{Account, Budget, Transaction, TransactionStatus, TransactionType, User};
use crate::recurrence;

use super::{MaterializationUnit, Store};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock only means a panicking test held it; the data is
        // still the latest committed state.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_user(&self, user: User) {
        self.locked().users.push(user);
    }

    pub fn insert_account(&self, account: Account) {
        self.locked().accounts.push(account);
    }

    pub fn insert_transaction(&self, transaction: Transaction) {
        self.locked().transactions.push(transaction);
    }

    pub fn insert_budget(&self, budget: Budget) {
        self.locked().budgets.push(budget);
    }

    /// Snapshot lookups for assertions.
    pub fn account(&self, id: Uuid) -> Option<Account> {
        self.locked().accounts.iter().find(|a| a.id == id).cloned()
    }

    pub fn budget(&self, id: Uuid) -> Option<Budget> {
        self.locked().budgets.iter().find(|b| b.id == id).cloned()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.locked().transactions.clone()
    }
}

impl Store for MemoryStore {
    fn transaction(&self, id: Uuid, user_id: Uuid) -> Result<Option<Transaction>> {
        Ok(self
            .locked()
            .transactions
            .iter()
            .find(|t| t.id == id && t.user_id == user_id)
            .cloned())
    }

    fn due_recurring_transactions(&self, now: DateTime<Utc>) -> Result<Vec<Transaction>> {
        Ok(self
            .locked()
            .transactions
            .iter()
            .filter(|t| {
                t.is_recurring
                    && t.status == TransactionStatus::Completed
                    && recurrence::is_due(t, now)
            })
            .cloned()
            .collect())
    }

    fn users(&self) -> Result<Vec<User>> {
        Ok(self.locked().users.clone())
    }

    fn accounts_for_user(&self, user_id: Uuid) -> Result<Vec<Account>> {
        Ok(self
            .locked()
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    fn budgets(&self) -> Result<Vec<Budget>> {
        Ok(self.locked().budgets.clone())
    }

    fn transactions_in_range(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .locked()
            .transactions
            .iter()
            .filter(|t| {
                t.user_id == user_id
                    && t.account_id == account_id
                    && t.date >= start
                    && t.date <= end
            })
            .cloned()
            .collect())
    }

    fn expense_total_since(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        start: DateTime<Utc>,
    ) -> Result<f64> {
        Ok(self
            .locked()
            .transactions
            .iter()
            .filter(|t| {
                t.user_id == user_id
                    && t.account_id == account_id
                    && t.kind == TransactionType::Expense
                    && t.date >= start
            })
            .map(|t| t.amount)
            .sum())
    }

    fn set_budget_alert_sent(&self, budget_id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let mut tables = self.locked();
        if let Some(budget) = tables.budgets.iter_mut().find(|b| b.id == budget_id) {
            budget.last_alert_sent = Some(at);
        }
        Ok(())
    }

    fn commit_materialization(
        &self,
        source_id: Uuid,
        user_id: Uuid,
        unit: MaterializationUnit,
        still_due: &dyn Fn(&Transaction) -> bool,
    ) -> Result<bool> {
        let mut tables = self.locked();

        let Some(source_idx) = tables
            .transactions
            .iter()
            .position(|t| t.id == source_id && t.user_id == user_id)
        else {
            return Ok(false);
        };
        if !still_due(&tables.transactions[source_idx]) {
            return Ok(false);
        }
        let account_id = tables.transactions[source_idx].account_id;
        let Some(account_idx) = tables.accounts.iter().position(|a| a.id == account_id) else {
            return Ok(false);
        };

        tables.accounts[account_idx].balance += unit.balance_change;
        let source = &mut tables.transactions[source_idx];
        source.last_processed = Some(unit.last_processed);
        source.next_recurring_date = Some(unit.next_recurring_date);
        tables.transactions.push(unit.posted);

        Ok(true)
    }
}
