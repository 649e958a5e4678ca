//! Due-ness and next-occurrence computation for recurring transactions.
//!
//! Pure functions of their inputs; all side effects live in the job handlers
//! and the store.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::ledger::{RecurringInterval, Transaction};

/// Returns true when a recurring transaction should fire now.
///
/// A template that has never been processed is always eligible, regardless of
/// `next_recurring_date`. After the first run, only the scheduled next date
/// decides; a processed row with no next date never fires again.
pub fn is_due(transaction: &Transaction, now: DateTime<Utc>) -> bool {
    if transaction.last_processed.is_none() {
        return true;
    }
    match transaction.next_recurring_date {
        Some(next) => next <= now,
        None => false,
    }
}

/// Advances a fire time by one interval. Calendar steps clamp the day of
/// month to the target month's length, so a Jan 31 monthly schedule fires on
/// Feb 29 in a leap year rather than overflowing into March.
pub fn next_occurrence(from: DateTime<Utc>, interval: RecurringInterval) -> DateTime<Utc> {
    match interval {
        RecurringInterval::Daily => from + Duration::days(1),
        RecurringInterval::Weekly => from + Duration::days(7),
        RecurringInterval::Monthly => on_date(from, shift_month(from.date_naive(), 1)),
        RecurringInterval::Yearly => on_date(from, shift_year(from.date_naive(), 1)),
    }
}

fn on_date(from: DateTime<Utc>, date: NaiveDate) -> DateTime<Utc> {
    date.and_time(from.time()).and_utc()
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let mut day = date.day();
    let month = date.month();
    day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::ledger::TransactionType;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 30, 0).unwrap()
    }

    fn template() -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TransactionType::Expense,
            40.0,
            at(2024, 1, 1),
        )
        .recurring(RecurringInterval::Monthly)
    }

    #[test]
    fn advances_by_exactly_one_unit() {
        let from = at(2024, 3, 10);
        assert_eq!(next_occurrence(from, RecurringInterval::Daily), at(2024, 3, 11));
        assert_eq!(next_occurrence(from, RecurringInterval::Weekly), at(2024, 3, 17));
        assert_eq!(next_occurrence(from, RecurringInterval::Monthly), at(2024, 4, 10));
        assert_eq!(next_occurrence(from, RecurringInterval::Yearly), at(2025, 3, 10));
    }

    #[test]
    fn strictly_exceeds_origin_for_every_interval() {
        let from = at(2024, 12, 31);
        for interval in [
            RecurringInterval::Daily,
            RecurringInterval::Weekly,
            RecurringInterval::Monthly,
            RecurringInterval::Yearly,
        ] {
            assert!(next_occurrence(from, interval) > from, "{:?}", interval);
        }
    }

    #[test]
    fn monthly_clamps_to_end_of_shorter_month() {
        assert_eq!(
            next_occurrence(at(2024, 1, 31), RecurringInterval::Monthly),
            at(2024, 2, 29)
        );
        assert_eq!(
            next_occurrence(at(2023, 1, 31), RecurringInterval::Monthly),
            at(2023, 2, 28)
        );
        assert_eq!(
            next_occurrence(at(2024, 12, 31), RecurringInterval::Monthly),
            at(2025, 1, 31)
        );
    }

    #[test]
    fn yearly_clamps_leap_day() {
        assert_eq!(
            next_occurrence(at(2024, 2, 29), RecurringInterval::Yearly),
            at(2025, 2, 28)
        );
    }

    #[test]
    fn never_processed_is_always_due() {
        let now = at(2024, 6, 1);
        let txn = template().with_next_recurring_date(at(2030, 1, 1));
        assert!(is_due(&txn, now));
    }

    #[test]
    fn due_once_scheduled_date_arrives() {
        let now = at(2024, 6, 1);
        let processed = template().with_last_processed(at(2024, 5, 1));

        let overdue = processed.clone().with_next_recurring_date(at(2024, 5, 31));
        assert!(is_due(&overdue, now));

        let exact = processed.clone().with_next_recurring_date(now);
        assert!(is_due(&exact, now));

        let future = processed.clone().with_next_recurring_date(at(2024, 6, 2));
        assert!(!is_due(&future, now));

        // Processed but never rescheduled: stays quiet.
        assert!(!is_due(&processed, now));
    }
}
