//! Monthly report emails: prior-month stats plus best-effort AI insights,
//! one email per user, isolation per iteration.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::Result;
use crate::insights::{self, CompletionService};
use crate::ledger::{Account, User};
use crate::mail::{self, EmailMessage, Mailer};
use crate::stats::{self, prior_month_reference};
use crate::store::Store;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Runs on the first of the month. One user's failure (no account, store
/// hiccup, rejected send) is logged and never aborts the remaining users.
pub fn generate_monthly_reports(
    store: &dyn Store,
    completions: &dyn CompletionService,
    mailer: &dyn Mailer,
    now: DateTime<Utc>,
) -> Result<ReportSummary> {
    let users = store.users()?;
    let reference_day = prior_month_reference(now);
    let month_label = reference_day.format("%B").to_string();
    info!(users = users.len(), month = %month_label, "starting monthly report run");

    let mut summary = ReportSummary::default();
    for user in &users {
        match report_for_user(store, completions, mailer, user, reference_day, &month_label) {
            Ok(true) => summary.processed += 1,
            Ok(false) => summary.skipped += 1,
            Err(err) => {
                warn!(user = %user.id, %err, "monthly report failed");
                summary.skipped += 1;
            }
        }
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        "monthly report run complete"
    );
    Ok(summary)
}

fn report_for_user(
    store: &dyn Store,
    completions: &dyn CompletionService,
    mailer: &dyn Mailer,
    user: &User,
    reference_day: NaiveDate,
    month_label: &str,
) -> Result<bool> {
    let accounts = store.accounts_for_user(user.id)?;
    let Some(account) = pick_report_account(&accounts) else {
        warn!(user = %user.id, "user has no accounts, skipping report");
        return Ok(false);
    };

    let stats = stats::monthly_stats(store, user.id, account.id, reference_day)?;
    let insights = insights::generate_insights(completions, &stats, month_label);

    let message = EmailMessage {
        to: user.email.clone(),
        subject: mail::report_subject(month_label, &account.name),
        body: mail::render_monthly_report(user, &account.name, month_label, &stats, &insights),
    };
    mailer.send(&message)?;

    info!(user = %user.id, account = %account.name, "monthly report sent");
    Ok(true)
}

/// The default account, falling back to the first one the user owns.
fn pick_report_account(accounts: &[Account]) -> Option<&Account> {
    accounts
        .iter()
        .find(|account| account.is_default)
        .or_else(|| accounts.first())
}
