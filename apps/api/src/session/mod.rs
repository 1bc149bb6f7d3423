// Client-side session state for the upload and analysis flows.
// Pure state machines driven by the JSON bodies the HTTP endpoints return;
// nothing here performs I/O.

pub mod analysis;
pub mod resume;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No file to retry")]
    NoFileToRetry,

    #[error("Cannot retry - error is not retryable")]
    NotRetryable,

    #[error("No resume text available for retry")]
    NoResumeText,

    #[error("Cannot retry job comparison without job description")]
    MissingJobDescription,
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::NoFileToRetry => "NO_FILE",
            SessionError::NotRetryable => "NOT_RETRYABLE",
            SessionError::NoResumeText => "NO_RESUME_TEXT",
            SessionError::MissingJobDescription => "MISSING_JOB_DESCRIPTION",
        }
    }
}
