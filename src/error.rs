use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid parameters: {field} - {reason}")]
    InvalidParameters { field: String, reason: String },

    #[error("Date out of range: {days} days after {date}")]
    DateOutOfRange { date: NaiveDate, days: u64 },

    #[error("Invalid link: {0}")]
    InvalidLink(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl ScheduleError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ScheduleError::InvalidParameters {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<url::ParseError> for ScheduleError {
    fn from(e: url::ParseError) -> Self {
        ScheduleError::InvalidLink(e.to_string())
    }
}

impl From<csv::Error> for ScheduleError {
    fn from(e: csv::Error) -> Self {
        ScheduleError::Export(e.to_string())
    }
}

impl From<std::io::Error> for ScheduleError {
    fn from(e: std::io::Error) -> Self {
        ScheduleError::Export(e.to_string())
    }
}

/// Standard result type for schedule operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;
