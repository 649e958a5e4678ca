//! Materialization of one due recurring transaction: post a concrete copy,
//! shift the account balance, advance the template's schedule, atomically.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::errors::{JobError, Result};
use crate::ledger::{Transaction, TransactionType};
use crate::recurrence;
use crate::store::{MaterializationUnit, Store};

use super::RecurringWorkItem;

/// What one processing attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// All three writes were applied.
    Applied,
    /// Nothing was written: the template vanished, was not due, or lost a
    /// race against a prior run.
    Skipped,
}

/// Handles one `transaction.recurring.process` event.
///
/// Due-ness is checked twice: once here against the fetched row, and again by
/// the store against a fresh read inside the atomic unit. The second check is
/// what makes retries and concurrent deliveries of the same event idempotent:
/// an already-advanced schedule fails the guard and the whole unit becomes a
/// no-op. Store errors propagate so the invoking infrastructure can retry.
pub fn process_recurring_transaction(
    store: &dyn Store,
    item: &RecurringWorkItem,
    now: DateTime<Utc>,
) -> Result<MaterializeOutcome> {
    let Some(source) = store.transaction(item.transaction_id, item.user_id)? else {
        warn!(
            transaction = %item.transaction_id,
            "recurring template vanished before processing"
        );
        return Ok(MaterializeOutcome::Skipped);
    };

    if !source.is_recurring {
        warn!(transaction = %source.id, "work item points at a non-recurring row");
        return Ok(MaterializeOutcome::Skipped);
    }
    if !recurrence::is_due(&source, now) {
        return Ok(MaterializeOutcome::Skipped);
    }

    let interval = source.recurring_interval.ok_or_else(|| {
        JobError::InvalidSchedule(format!("recurring transaction {} has no interval", source.id))
    })?;

    let unit = MaterializationUnit {
        posted: posted_copy(&source, now),
        balance_change: signed_amount(&source),
        last_processed: now,
        next_recurring_date: recurrence::next_occurrence(now, interval),
    };

    let applied =
        store.commit_materialization(source.id, source.user_id, unit, &|fresh| {
            recurrence::is_due(fresh, now)
        })?;

    if applied {
        info!(
            transaction = %source.id,
            interval = interval.label(),
            amount = source.amount,
            "materialized recurring transaction"
        );
        Ok(MaterializeOutcome::Applied)
    } else {
        Ok(MaterializeOutcome::Skipped)
    }
}

/// Concrete posted row copied from the template, stamped with `now` and
/// marked machine-generated.
fn posted_copy(source: &Transaction, now: DateTime<Utc>) -> Transaction {
    Transaction::new(source.user_id, source.account_id, source.kind, source.amount, now)
        .with_description(format!("{} (Recurring)", source.description))
        .with_category(source.category.clone())
}

fn signed_amount(source: &Transaction) -> f64 {
    match source.kind {
        TransactionType::Expense => -source.amount,
        TransactionType::Income => source.amount,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::ledger::RecurringInterval;

    #[test]
    fn posted_copy_is_a_plain_completed_row() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let template = Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TransactionType::Expense,
            40.0,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
        .with_description("Gym")
        .with_category("health")
        .recurring(RecurringInterval::Monthly);

        let posted = posted_copy(&template, now);
        assert_eq!(posted.description, "Gym (Recurring)");
        assert_eq!(posted.category, "health");
        assert_eq!(posted.date, now);
        assert!(!posted.is_recurring);
        assert!(posted.recurring_interval.is_none());
        assert_ne!(posted.id, template.id);
    }

    #[test]
    fn balance_delta_is_signed_by_kind() {
        let expense = Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TransactionType::Expense,
            40.0,
            Utc::now(),
        );
        let mut income = expense.clone();
        income.kind = TransactionType::Income;
        assert_eq!(signed_amount(&expense), -40.0);
        assert_eq!(signed_amount(&income), 40.0);
    }
}
