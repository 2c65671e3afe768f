//! Offline reports.
//!
//! # Usage
//!
//! ```bash
//! giftly report analytics --range ytd
//! giftly report analytics --start 2026-01-01 --end 2026-03-31 --top 20
//! ```

use chrono::Utc;
use thiserror::Error;

use giftly_core::analytics::{DateWindow, DateWindowError, aggregate};
use giftly_server::db::{AnalyticsRepository, RepositoryError, create_pool};

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Missing environment variable: GIFTLY_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Invalid window: {0}")]
    Window(#[from] DateWindowError),

    #[error("top must be between 1 and 100")]
    InvalidTop,

    #[error("Database connection error: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Aggregate the analytics report and print it as pretty JSON.
///
/// # Errors
///
/// Returns `ReportError` for invalid arguments and database failures.
pub async fn analytics(
    range: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    top: Option<usize>,
) -> Result<(), ReportError> {
    let today = Utc::now().date_naive();
    let window = DateWindow::from_query(range, start, end, today)?;
    let top = top.unwrap_or(giftly_core::analytics::DEFAULT_TOP_N);
    if !(1..=100).contains(&top) {
        return Err(ReportError::InvalidTop);
    }

    let database_url = super::database_url().ok_or(ReportError::MissingDatabaseUrl)?;
    let pool = create_pool(&database_url).await?;

    tracing::info!(start = %window.start, end = %window.end, "Loading analytics input");
    let input = AnalyticsRepository::new(&pool)
        .load_input(window, today, top)
        .await?;
    let report = aggregate(&input);

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
