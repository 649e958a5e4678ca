use thiserror::Error;

use crate::mail::MailError;

/// Unified error type for the job core.
///
/// Missing entities have no variant on purpose: a transaction, account, or
/// budget that vanished between discovery and processing is a no-op for the
/// handler that noticed it, not a failure.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Invalid recurring schedule: {0}")]
    InvalidSchedule(String),
    #[error("Mail delivery failed: {0}")]
    Mail(String),
}

pub type Result<T> = std::result::Result<T, JobError>;

impl From<std::io::Error> for JobError {
    fn from(err: std::io::Error) -> Self {
        JobError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for JobError {
    fn from(err: serde_json::Error) -> Self {
        JobError::Storage(err.to_string())
    }
}

impl From<MailError> for JobError {
    fn from(err: MailError) -> Self {
        JobError::Mail(err.to_string())
    }
}
