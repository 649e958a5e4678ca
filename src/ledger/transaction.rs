use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A posted or scheduled ledger entry. Recurring rows double as templates:
/// the trigger sweep finds due templates and the materializer posts concrete
/// copies with `is_recurring` cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub account_id: Uuid,
    pub kind: TransactionType,
    /// Positive amount; the sign is derived from `kind` at posting time.
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub is_recurring: bool,
    /// Present iff `is_recurring`; a recurring row without an interval is a
    /// configuration error surfaced by the materializer.
    pub recurring_interval: Option<RecurringInterval>,
    pub last_processed: Option<DateTime<Utc>>,
    /// Once set by a successful materialization this is the next planned
    /// fire time and is never in the past immediately after the run.
    pub next_recurring_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        account_id: Uuid,
        kind: TransactionType,
        amount: f64,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            account_id,
            kind,
            amount,
            description: String::new(),
            date,
            category: "general".into(),
            is_recurring: false,
            recurring_interval: None,
            last_processed: None,
            next_recurring_date: None,
            status: TransactionStatus::Completed,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks this row as a recurring template on the given interval.
    pub fn recurring(mut self, interval: RecurringInterval) -> Self {
        self.is_recurring = true;
        self.recurring_interval = Some(interval);
        self
    }

    pub fn with_last_processed(mut self, at: DateTime<Utc>) -> Self {
        self.last_processed = Some(at);
        self
    }

    pub fn with_next_recurring_date(mut self, at: DateTime<Utc>) -> Self {
        self.next_recurring_date = Some(at);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecurringInterval {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurringInterval {
    pub fn label(&self) -> &'static str {
        match self {
            RecurringInterval::Daily => "Daily",
            RecurringInterval::Weekly => "Weekly",
            RecurringInterval::Monthly => "Monthly",
            RecurringInterval::Yearly => "Yearly",
        }
    }
}
