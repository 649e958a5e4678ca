//! Best-effort financial insight generation through a text-completion
//! service.
//!
//! Every failure path (transport, timeout, malformed payload, short arrays)
//! resolves to a fixed three-string fallback; callers never see an error.

use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::warn;

use crate::stats::MonthlyStats;

/// Number of insight strings a report carries, always.
pub const INSIGHT_COUNT: usize = 3;

static NO_DATA_INSIGHTS: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        "No transactions found for this month.".into(),
        "Start tracking your expenses to get personalized insights.".into(),
        "Add your income and expenses to see detailed analysis.".into(),
    ]
});

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(String),
    #[error("completion request timed out")]
    Timeout,
}

/// External text-completion call. No guarantee on output format beyond
/// best-effort prompt compliance.
pub trait CompletionService: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Produces exactly [`INSIGHT_COUNT`] insight strings for the month.
///
/// Months with no activity short-circuit to a fixed message set without
/// touching the completion service.
pub fn generate_insights(
    service: &dyn CompletionService,
    stats: &MonthlyStats,
    month_label: &str,
) -> Vec<String> {
    if stats.is_empty() {
        return NO_DATA_INSIGHTS.clone();
    }

    let prompt = build_prompt(stats, month_label);
    match request_insights(service, &prompt) {
        Ok(insights) => insights,
        Err(reason) => {
            warn!(%reason, month = month_label, "falling back to canned insights");
            fallback_insights(stats, month_label)
        }
    }
}

fn request_insights(service: &dyn CompletionService, prompt: &str) -> Result<Vec<String>, String> {
    let raw = service.complete(prompt).map_err(|err| err.to_string())?;
    let cleaned = strip_code_fences(&raw);
    let parsed: Vec<String> =
        serde_json::from_str(&cleaned).map_err(|err| format!("unparseable payload: {err}"))?;
    if parsed.len() < INSIGHT_COUNT {
        return Err(format!(
            "expected {} insights, got {}",
            INSIGHT_COUNT,
            parsed.len()
        ));
    }
    Ok(parsed.into_iter().take(INSIGHT_COUNT).collect())
}

fn build_prompt(stats: &MonthlyStats, month_label: &str) -> String {
    let categories = stats
        .by_category
        .iter()
        .map(|(category, amount)| format!("{category}: ${amount}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Analyze this financial data and provide 3 concise, actionable insights.\n\
         Keep it helpful and conversational.\n\n\
         Financial Data for {month_label}:\n\
         - Total Income: ${income}\n\
         - Total Expenses: ${expenses}\n\
         - Net Income: ${net}\n\
         - Expense Categories: {categories}\n\n\
         IMPORTANT: Respond ONLY with a JSON array of exactly 3 strings. \
         No markdown, no code blocks, just the array.\n\
         Example: [\"insight 1\", \"insight 2\", \"insight 3\"]",
        income = stats.total_income,
        expenses = stats.total_expenses,
        net = stats.net(),
    )
}

fn fallback_insights(stats: &MonthlyStats, month_label: &str) -> Vec<String> {
    vec![
        format!(
            "Your spending in {month_label} totaled ${:.2}.",
            stats.total_expenses
        ),
        "Track your expenses regularly to identify spending patterns.".into(),
        "Consider setting category-specific budgets for better control.".into(),
    ]
}

fn strip_code_fences(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim().trim_matches('`').trim().to_string()
}
