//! Outbound email contract and the plain-text bodies the job handlers send.

use thiserror::Error;

use crate::insights;
use crate::ledger::User;
use crate::stats::MonthlyStats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail rejected: {0}")]
    Rejected(String),
    #[error("mail transport error: {0}")]
    Transport(String),
}

/// Fire-and-forget delivery; the only signal is the immediate accept/reject.
pub trait Mailer: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

pub fn report_subject(month_label: &str, account_name: &str) -> String {
    format!("Your Monthly Report - {month_label} - {account_name}")
}

pub fn alert_subject(account_name: &str) -> String {
    format!("Budget Alert - {account_name}")
}

pub fn render_monthly_report(
    user: &User,
    account_name: &str,
    month_label: &str,
    stats: &MonthlyStats,
    insights: &[String],
) -> String {
    let mut body = format!(
        "Hi {name},\n\n\
         Here is your {month_label} report for {account_name}.\n\n\
         Total Income: ${income:.2}\n\
         Total Expenses: ${expenses:.2}\n\
         Net: ${net:.2}\n\
         Transactions: {count}\n",
        name = user.name,
        income = stats.total_income,
        expenses = stats.total_expenses,
        net = stats.net(),
        count = stats.transaction_count,
    );

    if !stats.by_category.is_empty() {
        body.push_str("\nSpending by category:\n");
        for (category, amount) in &stats.by_category {
            body.push_str(&format!("  {category}: ${amount:.2}\n"));
        }
    }

    body.push_str("\nInsights:\n");
    for insight in insights.iter().take(insights::INSIGHT_COUNT) {
        body.push_str(&format!("  - {insight}\n"));
    }

    body
}

pub fn render_budget_alert(
    user: &User,
    account_name: &str,
    percent_used: f64,
    budget_amount: f64,
    total_expenses: f64,
) -> String {
    format!(
        "Hi {name},\n\n\
         You have used {percent_used:.1}% of your monthly budget for \
         {account_name}.\n\n\
         Budget: ${budget_amount:.2}\n\
         Spent so far: ${total_expenses:.2}\n\
         Remaining: ${remaining:.2}\n",
        name = user.name,
        remaining = budget_amount - total_expenses,
    )
}
