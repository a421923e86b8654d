use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TimesheetError};

/// The validated record handed over by the form layer.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetInput {
    #[serde(alias = "monthYear")]
    pub period: Period,
    pub work_days: WorkDays,
    #[serde(default)]
    pub events: Vec<Event>,
    pub employees: Vec<Employee>,
}

/// A calendar month of a given year.
///
/// Deserializes from `{ "year": 2024, "month": 3 }` or from a date string
/// (`"2024-03"`, `"2024-03-15"`, `"2024-03-01T08:00:00.000Z"`); only the
/// year and month of the written date are kept.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "PeriodRepr")]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PeriodRepr {
    Parts { year: i32, month: u32 },
    Date(String),
}

impl TryFrom<PeriodRepr> for Period {
    type Error = String;

    fn try_from(repr: PeriodRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            PeriodRepr::Parts { year, month } => Ok(Self { year, month }),
            PeriodRepr::Date(text) => {
                let day = text.get(..10).unwrap_or(text.as_str());
                NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .or_else(|_| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d"))
                    .map(|date| Self {
                        year: date.year(),
                        month: date.month(),
                    })
                    .map_err(|e| format!("invalid period '{text}': {e}"))
            }
        }
    }
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    fn invalid(&self) -> TimesheetError {
        TimesheetError::InvalidPeriod {
            year: self.year,
            month: self.month,
        }
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(|| self.invalid())
    }

    /// Number of days in the month (28-31).
    pub fn days_in_month(&self) -> Result<u32> {
        let first = self.first_day()?;
        let next = first
            .checked_add_months(chrono::Months::new(1))
            .ok_or_else(|| self.invalid())?;

        Ok(next.signed_duration_since(first).num_days() as u32)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// "March, 2024"
    pub fn label(&self) -> Result<String> {
        let month = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| self.invalid())?;

        Ok(format!("{}, {}", month.name(), self.year))
    }
}

/// Default billability of each weekday.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct WorkDays {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl WorkDays {
    /// Monday to Friday billable, weekends off.
    pub fn weekdays() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
        }
    }

    pub fn is_billable(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

/// A single-date override such as a holiday or closure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub full_name: String,
}

impl Employee {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }
}

/// One day of the period, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRow {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_billable: bool,
    pub description: String,
}

impl DayRow {
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// Consecutive days ending on the week boundary (or at the end of the month).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Week {
    pub days: Vec<DayRow>,
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

impl fmt::Display for DayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<9} {}",
            self.date.format("%d"),
            self.weekday_name(),
            if self.is_billable { "billable" } else { "off" }
        )?;
        if !self.description.is_empty() {
            write!(f, " ({})", self.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(Period::new(2024, 2).days_in_month(), Ok(29));
        assert_eq!(Period::new(2023, 2).days_in_month(), Ok(28));
        assert_eq!(Period::new(2024, 3).days_in_month(), Ok(31));
        assert_eq!(Period::new(2024, 4).days_in_month(), Ok(30));
        assert_eq!(Period::new(2024, 12).days_in_month(), Ok(31));
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert_eq!(
            Period::new(2024, 13).days_in_month(),
            Err(TimesheetError::InvalidPeriod {
                year: 2024,
                month: 13
            })
        );
        assert!(Period::new(2024, 0).label().is_err());
    }

    #[test]
    fn label_uses_full_month_name() {
        assert_eq!(Period::new(2024, 3).label().unwrap(), "March, 2024");
    }

    #[test]
    fn input_deserializes_from_form_json() {
        let json = r#"{
            "monthYear": { "year": 2024, "month": 3 },
            "workDays": {
                "Monday": true, "Tuesday": true, "Wednesday": true, "Thursday": true,
                "Friday": true, "Saturday": false, "Sunday": false
            },
            "events": [{ "date": "2024-03-10" }],
            "employees": [{ "fullName": "Jane Doe" }]
        }"#;

        let input: TimesheetInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.period, Period::new(2024, 3));
        assert_eq!(input.work_days, WorkDays::weekdays());
        assert_eq!(input.events[0].description, None);
        assert_eq!(input.employees[0].full_name, "Jane Doe");
    }

    #[test]
    fn period_accepts_date_strings() {
        for text in ["\"2024-03\"", "\"2024-03-15\"", "\"2024-03-01T08:00:00.000Z\""] {
            let period: Period = serde_json::from_str(text).unwrap();
            assert_eq!(period, Period::new(2024, 3), "{text}");
        }
        assert!(serde_json::from_str::<Period>("\"2024-13-01\"").is_err());
        assert!(serde_json::from_str::<Period>("\"March\"").is_err());
    }

    #[test]
    fn input_accepts_form_month_year_string() {
        let json = r#"{
            "monthYear": "2024-03-01T08:00:00.000Z",
            "workDays": {
                "Monday": true, "Tuesday": true, "Wednesday": true, "Thursday": true,
                "Friday": true, "Saturday": false, "Sunday": false
            },
            "events": [{ "date": "2024-03-10", "description": "Office Closed" }],
            "employees": [{ "fullName": "Jane Doe" }]
        }"#;

        let input: TimesheetInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.period, Period::new(2024, 3));
        assert_eq!(input.events[0].description.as_deref(), Some("Office Closed"));
    }

    #[test]
    fn events_default_to_empty() {
        let json = r#"{
            "period": { "year": 2024, "month": 3 },
            "workDays": {
                "Monday": true, "Tuesday": true, "Wednesday": true, "Thursday": true,
                "Friday": true, "Saturday": true, "Sunday": true
            },
            "employees": []
        }"#;

        let input: TimesheetInput = serde_json::from_str(json).unwrap();
        assert!(input.events.is_empty());
    }
}
