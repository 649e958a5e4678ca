//! Monthly income/expense aggregation for report generation.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;
use crate::ledger::TransactionType;
use crate::store::Store;

/// One account's activity for a calendar month, folded from raw rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonthlyStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub by_category: BTreeMap<String, f64>,
    pub transaction_count: usize,
}

impl MonthlyStats {
    pub fn net(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    pub fn is_empty(&self) -> bool {
        self.total_income == 0.0 && self.total_expenses == 0.0
    }
}

/// Inclusive bounds of the calendar month containing `reference_day`: the
/// first instant of day one through the last second of the final day.
pub fn month_window(reference_day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = reference_day.with_day(1).unwrap();
    let last_day = crate::recurrence::days_in_month(first.year(), first.month());
    let last = first.with_day(last_day).unwrap();
    let start = first.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end = last.and_hms_opt(23, 59, 59).unwrap().and_utc();
    (start, end)
}

/// First instant of the calendar month containing `now`.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// A representative day of the month before the one containing `now`.
pub fn prior_month_reference(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive().with_day(1).unwrap() - Duration::days(1)
}

/// Fetches one account's transactions for the month of `reference_day` and
/// reduces them. Expense amounts land in `total_expenses` and their category
/// bucket; everything else counts as income. Read-only and deterministic.
pub fn monthly_stats(
    store: &dyn Store,
    user_id: Uuid,
    account_id: Uuid,
    reference_day: NaiveDate,
) -> Result<MonthlyStats> {
    let (start, end) = month_window(reference_day);
    let transactions = store.transactions_in_range(user_id, account_id, start, end)?;

    let mut stats = MonthlyStats {
        transaction_count: transactions.len(),
        ..MonthlyStats::default()
    };
    for txn in &transactions {
        match txn.kind {
            TransactionType::Expense => {
                stats.total_expenses += txn.amount;
                *stats.by_category.entry(txn.category.clone()).or_insert(0.0) += txn.amount;
            }
            TransactionType::Income => stats.total_income += txn.amount,
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::ledger::{Account, Transaction, User};
    use crate::store::MemoryStore;

    #[test]
    fn month_window_covers_whole_month_inclusive() {
        let (start, end) = month_window(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap());
    }

    #[test]
    fn prior_month_reference_lands_in_previous_month() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 5, 0).unwrap();
        assert_eq!(
            prior_month_reference(now),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn folds_expenses_by_category_and_income_together() {
        let store = MemoryStore::new();
        let user = User::new("Dana", "dana@example.com");
        let account = Account::new(user.id, "Checking", 1000.0);
        let date = Utc.with_ymd_and_hms(2024, 4, 10, 12, 0, 0).unwrap();

        store.insert_transaction(
            Transaction::new(user.id, account.id, TransactionType::Expense, 100.0, date)
                .with_category("food"),
        );
        store.insert_transaction(
            Transaction::new(user.id, account.id, TransactionType::Expense, 50.0, date)
                .with_category("food"),
        );
        store.insert_transaction(Transaction::new(
            user.id,
            account.id,
            TransactionType::Income,
            500.0,
            date,
        ));
        // Outside the window and outside the account: both ignored.
        store.insert_transaction(Transaction::new(
            user.id,
            account.id,
            TransactionType::Expense,
            999.0,
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        ));
        store.insert_transaction(Transaction::new(
            user.id,
            Uuid::new_v4(),
            TransactionType::Expense,
            999.0,
            date,
        ));

        let stats = monthly_stats(
            &store,
            user.id,
            account.id,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        )
        .unwrap();

        assert_eq!(stats.total_income, 500.0);
        assert_eq!(stats.total_expenses, 150.0);
        assert_eq!(stats.by_category.get("food"), Some(&150.0));
        assert_eq!(stats.transaction_count, 3);
        assert_eq!(stats.net(), 350.0);
    }
}
