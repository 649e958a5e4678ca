//! Shared fixtures: recording collaborator doubles and date helpers.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use ledger_jobs::errors::{JobError, Result};
use ledger_jobs::insights::{CompletionError, CompletionService};
use ledger_jobs::jobs::{EventSink, RecurringWorkItem};
use ledger_jobs::mail::{EmailMessage, MailError, Mailer};

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
}

/// Mailer double that records accepted messages and can be told to reject.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail_all: bool,
    fail_once: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn failing_once() -> Self {
        Self {
            fail_once: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, message: &EmailMessage) -> std::result::Result<(), MailError> {
        if self.fail_all || self.fail_once.swap(false, Ordering::SeqCst) {
            return Err(MailError::Rejected("mailbox unavailable".into()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Event sink double; `failing_once` rejects the first emit only.
#[derive(Default)]
pub struct RecordingSink {
    items: Mutex<Vec<RecurringWorkItem>>,
    fail_once: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_once() -> Self {
        Self {
            fail_once: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn items(&self) -> Vec<RecurringWorkItem> {
        self.items.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, item: RecurringWorkItem) -> Result<()> {
        if self.fail_once.swap(false, Ordering::SeqCst) {
            return Err(JobError::Storage("queue unavailable".into()));
        }
        self.items.lock().unwrap().push(item);
        Ok(())
    }
}

/// Completion double returning a fixed payload.
pub struct CannedCompletions(pub &'static str);

impl CompletionService for CannedCompletions {
    fn complete(&self, _prompt: &str) -> std::result::Result<String, CompletionError> {
        Ok(self.0.to_string())
    }
}

/// Completion double that always fails.
pub struct FailingCompletions;

impl CompletionService for FailingCompletions {
    fn complete(&self, _prompt: &str) -> std::result::Result<String, CompletionError> {
        Err(CompletionError::Request("service down".into()))
    }
}
