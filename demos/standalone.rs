use axum::Router;
use std::env;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use timesheet_compiler::service::{TimesheetConfig, TimesheetService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    info!("Starting Timesheet Service example");

    let config = TimesheetConfig::from_env();
    let addr = env::var("TIMESHEET_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    // Create the timesheet service
    let timesheet_service = TimesheetService::new(config);

    let app = Router::new().nest("/api", timesheet_service.router());

    // Start server
    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/*
Example usage of the service:

1. POST /api/timesheet
   - Body: the form record as JSON
   - Returns the PDF (application/pdf)

2. POST /api/timesheet/data-url
   - Same body, returns a data URL suitable for an <iframe> preview

3. GET /api/health

Example body:

{
  "period": { "year": 2024, "month": 3 },
  "workDays": { "Monday": true, "Tuesday": true, "Wednesday": true,
                "Thursday": true, "Friday": true, "Saturday": true, "Sunday": false },
  "events": [{ "date": "2024-03-10", "description": "Office Closed" }],
  "employees": [{ "fullName": "Jane Doe" }]
}
*/
