//! The four scheduled/event-driven job handlers and their registration table.
//!
//! Each handler is a plain function taking its collaborators and an explicit
//! `now`, so tests pin time. [`JobRunner`] bundles process-scoped
//! collaborators behind `Arc`s and exposes the descriptor table the external
//! job runner consults at startup.

pub mod alerts;
pub mod materialize;
pub mod reports;
pub mod trigger;

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JobConfig;
use crate::errors::Result;
use crate::insights::CompletionService;
use crate::mail::Mailer;
use crate::store::Store;

pub use alerts::{check_budget_alerts, should_alert, AlertSummary};
pub use materialize::{process_recurring_transaction, MaterializeOutcome};
pub use reports::{generate_monthly_reports, ReportSummary};
pub use trigger::{trigger_recurring_transactions, TriggerSummary};

/// Event name carrying a [`RecurringWorkItem`].
pub const RECURRING_PROCESS_EVENT: &str = "transaction.recurring.process";

/// Daily at midnight: discover due recurring templates.
pub const TRIGGER_RECURRING_CRON: &str = "0 0 * * *";
/// First of each month at midnight: prior-month report emails.
pub const MONTHLY_REPORTS_CRON: &str = "0 0 1 * *";
/// Every six hours: budget threshold sweep.
pub const BUDGET_ALERTS_CRON: &str = "0 */6 * * *";

/// How the external scheduler invokes a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Cron(&'static str),
    Event(&'static str),
}

/// Registration metadata for one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub trigger: Trigger,
}

/// Fan-out payload: one due recurring template to process independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurringWorkItem {
    pub transaction_id: Uuid,
    pub user_id: Uuid,
}

/// Seam to the external job queue. The trigger sweep emits one item per due
/// template so a single failure cannot block its siblings.
pub trait EventSink: Send + Sync {
    fn emit(&self, item: RecurringWorkItem) -> Result<()>;
}

/// Process-scoped bundle of collaborators shared by every handler.
pub struct JobRunner {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    completions: Arc<dyn CompletionService>,
    events: Arc<dyn EventSink>,
    config: JobConfig,
}

impl JobRunner {
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        completions: Arc<dyn CompletionService>,
        events: Arc<dyn EventSink>,
        config: JobConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            completions,
            events,
            config,
        }
    }

    /// The table the job runner registers at startup.
    pub fn descriptors() -> Vec<JobDescriptor> {
        vec![
            JobDescriptor {
                id: "process-recurring-transaction",
                name: "Process Recurring Transaction",
                trigger: Trigger::Event(RECURRING_PROCESS_EVENT),
            },
            JobDescriptor {
                id: "trigger-recurring-transactions",
                name: "Trigger Recurring Transactions",
                trigger: Trigger::Cron(TRIGGER_RECURRING_CRON),
            },
            JobDescriptor {
                id: "generate-monthly-reports",
                name: "Generate Monthly Reports",
                trigger: Trigger::Cron(MONTHLY_REPORTS_CRON),
            },
            JobDescriptor {
                id: "check-budget-alerts",
                name: "Check Budget Alerts",
                trigger: Trigger::Cron(BUDGET_ALERTS_CRON),
            },
        ]
    }

    pub fn process_recurring_transaction(
        &self,
        item: RecurringWorkItem,
    ) -> Result<MaterializeOutcome> {
        materialize::process_recurring_transaction(self.store.as_ref(), &item, Utc::now())
    }

    pub fn trigger_recurring_transactions(&self) -> Result<TriggerSummary> {
        trigger::trigger_recurring_transactions(
            self.store.as_ref(),
            self.events.as_ref(),
            Utc::now(),
        )
    }

    pub fn generate_monthly_reports(&self) -> Result<ReportSummary> {
        reports::generate_monthly_reports(
            self.store.as_ref(),
            self.completions.as_ref(),
            self.mailer.as_ref(),
            Utc::now(),
        )
    }

    pub fn check_budget_alerts(&self) -> Result<AlertSummary> {
        alerts::check_budget_alerts(
            self.store.as_ref(),
            self.mailer.as_ref(),
            &self.config,
            Utc::now(),
        )
    }
}
