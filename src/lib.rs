//! Ledger Jobs is the scheduled job core behind a personal finance ledger:
//! it materializes due recurring transactions, watches budgets for threshold
//! breaches, and assembles monthly report emails with best-effort AI insights.
//!
//! The crate owns the decision logic and the transactional materialization
//! protocol only. Persistence, mail delivery, text completion, and the
//! cron/event scheduler are external collaborators reached through the
//! [`store::Store`], [`mail::Mailer`], [`insights::CompletionService`], and
//! [`jobs::EventSink`] traits.

pub mod config;
pub mod errors;
pub mod insights;
pub mod jobs;
pub mod ledger;
pub mod mail;
pub mod recurrence;
pub mod stats;
pub mod store;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        init_tracing();
        tracing::info!("Ledger Jobs tracing initialized.");
    });
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::from_default_env().add_directive("ledger_jobs=info".parse().unwrap());

    fmt().with_env_filter(filter).init();
}
