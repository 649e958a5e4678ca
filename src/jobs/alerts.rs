//! Six-hourly budget sweep: month-to-date spend against each budget's
//! ceiling, with one alert per budget per calendar month.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::JobConfig;
use crate::errors::Result;
use crate::ledger::Budget;
use crate::mail::{self, EmailMessage, Mailer};
use crate::stats::month_start;
use crate::store::Store;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AlertSummary {
    /// Budgets whose spend was actually evaluated.
    pub budgets_checked: usize,
    /// Budgets with no resolvable default account, or whose check failed.
    pub skipped: usize,
    pub alerts_sent: usize,
}

/// Pure alert decision: over threshold, and no alert sent yet this calendar
/// month.
pub fn should_alert(
    percent_used: f64,
    threshold: f64,
    last_alert_sent: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    percent_used >= threshold
        && match last_alert_sent {
            None => true,
            Some(last) => last.month() != now.month() || last.year() != now.year(),
        }
}

/// Iterates every budget row. The email goes out before the alert timestamp
/// is persisted, so a failed send leaves the budget eligible for the next
/// sweep instead of silently suppressing it for the rest of the month.
pub fn check_budget_alerts(
    store: &dyn Store,
    mailer: &dyn Mailer,
    config: &JobConfig,
    now: DateTime<Utc>,
) -> Result<AlertSummary> {
    let budgets = store.budgets()?;
    info!(budgets = budgets.len(), "starting budget alert sweep");

    let mut summary = AlertSummary::default();
    for budget in &budgets {
        match check_budget(store, mailer, config, budget, now) {
            Ok(BudgetCheck::Alerted) => {
                summary.budgets_checked += 1;
                summary.alerts_sent += 1;
            }
            Ok(BudgetCheck::Quiet) => summary.budgets_checked += 1,
            Ok(BudgetCheck::NoDefaultAccount) => summary.skipped += 1,
            Err(err) => {
                warn!(budget = %budget.id, %err, "budget check failed");
                summary.skipped += 1;
            }
        }
    }

    info!(
        checked = summary.budgets_checked,
        skipped = summary.skipped,
        alerts = summary.alerts_sent,
        "budget alert sweep complete"
    );
    Ok(summary)
}

enum BudgetCheck {
    Alerted,
    Quiet,
    NoDefaultAccount,
}

fn check_budget(
    store: &dyn Store,
    mailer: &dyn Mailer,
    config: &JobConfig,
    budget: &Budget,
    now: DateTime<Utc>,
) -> Result<BudgetCheck> {
    let accounts = store.accounts_for_user(budget.user_id)?;
    let Some(account) = accounts.iter().find(|account| account.is_default) else {
        warn!(budget = %budget.id, user = %budget.user_id, "no default account, skipping budget");
        return Ok(BudgetCheck::NoDefaultAccount);
    };

    let total = store.expense_total_since(budget.user_id, account.id, month_start(now))?;
    let percent_used = total / budget.amount * 100.0;
    debug!(
        budget = %budget.id,
        percent_used,
        total,
        ceiling = budget.amount,
        "budget evaluated"
    );

    if !should_alert(
        percent_used,
        config.alert_threshold_percent,
        budget.last_alert_sent,
        now,
    ) {
        return Ok(BudgetCheck::Quiet);
    }

    let Some(user) = store.users()?.into_iter().find(|u| u.id == budget.user_id) else {
        warn!(budget = %budget.id, "owning user vanished, skipping alert");
        return Ok(BudgetCheck::Quiet);
    };

    let message = EmailMessage {
        to: user.email.clone(),
        subject: mail::alert_subject(&account.name),
        body: mail::render_budget_alert(&user, &account.name, percent_used, budget.amount, total),
    };
    // Send first; only a delivered alert earns the suppression timestamp.
    mailer.send(&message)?;
    store.set_budget_alert_sent(budget.id, now)?;

    info!(budget = %budget.id, percent_used, "budget alert sent");
    Ok(BudgetCheck::Alerted)
}
