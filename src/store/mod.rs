//! Persistence contract consumed by the job handlers.

pub mod memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::Result;
use crate::ledger::{Account, Budget, Transaction, User};

pub use memory::MemoryStore;

/// The three writes of a recurring materialization, applied as one unit.
#[derive(Debug, Clone)]
pub struct MaterializationUnit {
    /// Concrete copy of the template to insert, already stamped and marked
    /// non-recurring.
    pub posted: Transaction,
    /// Signed balance delta for the owning account (negative for expenses).
    pub balance_change: f64,
    pub last_processed: DateTime<Utc>,
    pub next_recurring_date: DateTime<Utc>,
}

/// Abstraction over the relational store.
///
/// Reads, one point update, and one atomic multi-write primitive used
/// exclusively by the materializer. Implementations decide how atomicity is
/// achieved; callers only rely on the all-or-nothing contract.
pub trait Store: Send + Sync {
    /// Looks up a transaction scoped to its owning user.
    fn transaction(&self, id: Uuid, user_id: Uuid) -> Result<Option<Transaction>>;

    /// Recurring, completed templates that have never been processed or whose
    /// next fire time has arrived.
    fn due_recurring_transactions(&self, now: DateTime<Utc>) -> Result<Vec<Transaction>>;

    fn users(&self) -> Result<Vec<User>>;

    fn accounts_for_user(&self, user_id: Uuid) -> Result<Vec<Account>>;

    fn budgets(&self) -> Result<Vec<Budget>>;

    /// Transactions for one account within `[start, end]`, bounds inclusive.
    fn transactions_in_range(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>>;

    /// Sum of expense amounts for one account on or after `start`.
    fn expense_total_since(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        start: DateTime<Utc>,
    ) -> Result<f64>;

    /// Records when a budget's most recent alert went out. A vanished budget
    /// is a no-op.
    fn set_budget_alert_sent(&self, budget_id: Uuid, at: DateTime<Utc>) -> Result<()>;

    /// Applies a materialization unit atomically: insert the posted copy,
    /// shift the account balance, advance the source schedule.
    ///
    /// The source row is re-read inside the unit; if it is gone, its account
    /// is gone, or `still_due` rejects the fresh row (a prior run already
    /// advanced the schedule), nothing is applied and `Ok(false)` is
    /// returned. Persistence failures abort the whole unit and propagate so
    /// the invoking job infrastructure can retry; the guard makes that retry
    /// idempotent.
    fn commit_materialization(
        &self,
        source_id: Uuid,
        user_id: Uuid,
        unit: MaterializationUnit,
        still_due: &dyn Fn(&Transaction) -> bool,
    ) -> Result<bool>;
}
