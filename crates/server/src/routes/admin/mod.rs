//! Admin-only routes. Every handler takes [`crate::middleware::RequireAdmin`].

pub mod analytics;
pub mod payouts;
pub mod users;

use chrono::{NaiveDate, Utc};

use giftly_core::analytics::DateWindow;

use crate::error::{AppError, Result};

/// Resolve `range`/`start`/`end` query parameters into a window.
///
/// # Errors
///
/// Returns `AppError::BadRequest` with the window error message.
pub fn resolve_window(
    range: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
) -> Result<DateWindow> {
    DateWindow::from_query(range, start, end, today)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Today's date in UTC, the reference day for presets.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
