//! Error types for timesheet compilation.

use thiserror::Error;

/// Errors that abort a timesheet compilation.
///
/// None of these leave a partially rendered document behind: a failed
/// compilation returns only the error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimesheetError {
    /// The pay period does not resolve to a calendar month.
    #[error("Invalid pay period: {year}-{month:02}")]
    InvalidPeriod { year: i32, month: u32 },

    /// There is nobody to render a page for.
    #[error("At least one employee is required")]
    EmptyEmployeeList,

    /// The day classifier produced no weeks for the period.
    #[error("Pay period contains no days")]
    EmptyPeriod,

    /// The PDF backend failed to encode the document.
    #[error("Failed to encode PDF: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, TimesheetError>;
