use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::timesheet::{DayRow, Event, Period, Week, WorkDays};

/// The weekday that closes a week.
pub const WEEK_END: Weekday = Weekday::Sun;

/// Expands `period` into week buckets of classified days.
///
/// A day matching an event is never billable and carries the event's
/// description; every other day takes its weekday default from `work_days`.
/// If several events share a date the first one in `events` wins, and events
/// outside the period are ignored.
pub fn build_weeks(period: Period, work_days: &WorkDays, events: &[Event]) -> Result<Vec<Week>> {
    let first = period.first_day()?;
    let day_count = period.days_in_month()?;

    let mut overrides: HashMap<NaiveDate, &str> = HashMap::new();
    for event in events.iter().filter(|e| period.contains(e.date)) {
        overrides
            .entry(event.date)
            .or_insert_with(|| event.description.as_deref().unwrap_or(""));
    }
    debug!(
        "Indexed {} event override(s) for {}-{:02}",
        overrides.len(),
        period.year,
        period.month
    );

    let mut weeks = Vec::new();
    let mut current = Vec::with_capacity(7);

    for date in first.iter_days().take(day_count as usize) {
        let weekday = date.weekday();
        let row = match overrides.get(&date) {
            Some(description) => DayRow {
                date,
                weekday,
                is_billable: false,
                description: description.to_string(),
            },
            None => DayRow {
                date,
                weekday,
                is_billable: work_days.is_billable(weekday),
                description: String::new(),
            },
        };
        current.push(row);

        if weekday == WEEK_END {
            weeks.push(Week {
                days: std::mem::take(&mut current),
            });
        }
    }

    if !current.is_empty() {
        weeks.push(Week { days: current });
    }

    info!(
        "Built {} week(s) covering {} day(s) for {}-{:02}",
        weeks.len(),
        day_count,
        period.year,
        period.month
    );

    Ok(weeks)
}
