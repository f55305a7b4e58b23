//! Error types for shift-engine operations.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShiftError {
    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    /// The report carried no time entry to take a UTC offset from.
    #[error("No anchor: report contains no time entries")]
    NoAnchor,
}

pub type Result<T> = std::result::Result<T, ShiftError>;
