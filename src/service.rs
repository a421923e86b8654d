use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::{env, sync::Arc};
use tracing::{error, info};

use crate::{
    TimesheetInput,
    error::{Result, TimesheetError},
    helpers::{
        calendar::build_weeks,
        pdf::{TimesheetDocument, create_timesheet},
    },
};

/// Configuration for the timesheet service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimesheetConfig {
    pub company_name: String,
    pub app_name: String,
}

impl Default for TimesheetConfig {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            app_name: "Timesheet Generator".to_string(),
        }
    }
}

impl TimesheetConfig {
    /// Reads `TIMESHEET_COMPANY_NAME` and `TIMESHEET_APP_NAME`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source, e.g. the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let config = Self {
            company_name: lookup("TIMESHEET_COMPANY_NAME").unwrap_or(defaults.company_name),
            app_name: lookup("TIMESHEET_APP_NAME").unwrap_or(defaults.app_name),
        };
        info!(
            "Loaded timesheet config for company '{}' ({})",
            config.company_name, config.app_name
        );
        config
    }
}

/// Classifies the period once and lays out a page for every employee.
pub fn generate_timesheet(
    input: &TimesheetInput,
    config: &TimesheetConfig,
) -> Result<TimesheetDocument> {
    let weeks = build_weeks(input.period, &input.work_days, &input.events)?;

    create_timesheet(
        input.period,
        &input.employees,
        &weeks,
        &config.company_name,
        &config.app_name,
    )
}

/// The timesheet service that turns submitted form data into documents
#[derive(Clone)]
pub struct TimesheetService {
    pub config: TimesheetConfig,
}

impl TimesheetService {
    /// Create a new timesheet service instance
    pub fn new(config: TimesheetConfig) -> Self {
        info!("Creating new TimesheetService instance");
        Self { config }
    }

    /// Create an Axum router for the timesheet service
    pub fn router(self) -> Router {
        info!("Creating timesheet service router");
        let shared_state = Arc::new(self);

        Router::new()
            .route("/timesheet", post(timesheet_pdf))
            .route("/timesheet/data-url", post(timesheet_data_url))
            .route("/health", get(|| async { "OK" }))
            .with_state(shared_state)
    }

    pub fn generate(&self, input: &TimesheetInput) -> Result<TimesheetDocument> {
        info!(
            "Generating timesheet for {}-{:02} with {} employee(s)",
            input.period.year,
            input.period.month,
            input.employees.len()
        );
        generate_timesheet(input, &self.config)
    }
}

impl IntoResponse for TimesheetError {
    fn into_response(self) -> Response {
        let status = match self {
            TimesheetError::Serialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TimesheetError::InvalidPeriod { .. }
            | TimesheetError::EmptyEmployeeList
            | TimesheetError::EmptyPeriod => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, self.to_string()).into_response()
    }
}

// Route handlers
async fn timesheet_pdf(
    State(service): State<Arc<TimesheetService>>,
    Json(payload): Json<TimesheetInput>,
) -> std::result::Result<Response, TimesheetError> {
    info!("Received timesheet PDF request");

    let bytes = service
        .generate(&payload)
        .and_then(|document| document.to_bytes())
        .inspect_err(|e| error!("Failed to create timesheet PDF: {}", e))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "inline; filename=\"timesheet.pdf\""),
        ],
        bytes,
    )
        .into_response())
}

async fn timesheet_data_url(
    State(service): State<Arc<TimesheetService>>,
    Json(payload): Json<TimesheetInput>,
) -> std::result::Result<String, TimesheetError> {
    info!("Received timesheet preview request");

    service
        .generate(&payload)
        .and_then(|document| document.to_data_url())
        .inspect_err(|e| error!("Failed to create timesheet preview: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timesheet::{Employee, Period, WorkDays};
    use std::collections::HashMap;

    fn input(employees: Vec<Employee>) -> TimesheetInput {
        TimesheetInput {
            period: Period::new(2024, 3),
            work_days: WorkDays::weekdays(),
            events: vec![],
            employees,
        }
    }

    #[test]
    fn generate_rejects_missing_employees() {
        let result = generate_timesheet(&input(vec![]), &TimesheetConfig::default());
        assert_eq!(result.unwrap_err(), TimesheetError::EmptyEmployeeList);
    }

    #[test]
    fn generate_reports_invalid_period_before_layout() {
        let mut bad = input(vec![Employee::new("Jane Doe")]);
        bad.period = Period::new(2024, 0);
        let result = generate_timesheet(&bad, &TimesheetConfig::default());
        assert_eq!(
            result.unwrap_err(),
            TimesheetError::InvalidPeriod {
                year: 2024,
                month: 0
            }
        );
    }

    #[test]
    fn config_falls_back_to_defaults() {
        let config = TimesheetConfig::from_lookup(|_| None);
        assert_eq!(config, TimesheetConfig::default());
        assert_eq!(config.company_name, "");
        assert_eq!(config.app_name, "Timesheet Generator");
    }

    #[test]
    fn config_reads_named_variables() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TIMESHEET_COMPANY_NAME", "Acme Corp"),
            ("TIMESHEET_APP_NAME", "Payroll"),
            ("COMPANY_NAME", "Ignored"),
        ]);
        let config = TimesheetConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(
            config,
            TimesheetConfig {
                company_name: "Acme Corp".to_string(),
                app_name: "Payroll".to_string(),
            }
        );
    }

    #[test]
    fn config_keeps_default_for_missing_variable() {
        let config = TimesheetConfig::from_lookup(|name| {
            (name == "TIMESHEET_COMPANY_NAME").then(|| "Acme Corp".to_string())
        });
        assert_eq!(config.company_name, "Acme Corp");
        assert_eq!(config.app_name, "Timesheet Generator");
    }

    #[test]
    fn errors_map_to_status_codes() {
        assert_eq!(
            TimesheetError::EmptyEmployeeList.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            TimesheetError::Serialize("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
