//! Timesheet Compiler Library
//!
//! This library turns a validated monthly timesheet description (pay period,
//! billable weekdays, date overrides and employees) into a printable PDF
//! with one page per employee.

pub mod error;
pub mod helpers;
pub mod models;
pub mod service;

pub use error::TimesheetError;
pub use service::{TimesheetConfig, TimesheetService, generate_timesheet};

// Re-export key types for convenience
pub use helpers::calendar::build_weeks;
pub use helpers::pdf::{TimesheetDocument, create_timesheet};
pub use models::timesheet::{DayRow, Employee, Event, Period, TimesheetInput, Week, WorkDays};
