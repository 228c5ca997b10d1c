//! Date parsing and month-range utilities for archive selection

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::error::AppError;

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        AppError::datetime_parse_error(format!("Invalid date '{value}' (expected YYYY-MM-DD): {e}"))
    })
}

/// Rejects ranges where `since` is after `until`.
pub fn validate_date_range(since: NaiveDate, until: NaiveDate) -> Result<(), AppError> {
    if since > until {
        return Err(AppError::config_error(format!(
            "Start date {since} is after end date {until}"
        )));
    }
    Ok(())
}

/// Inclusive `(year, month)` list covering `[since, until]`.
/// Empty when `since` is after `until`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use fide_bands::data_fetcher::api::month_range;
///
/// let since = NaiveDate::from_ymd_opt(2023, 11, 20).unwrap();
/// let until = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
/// assert_eq!(month_range(since, until), vec![(2023, 11), (2023, 12), (2024, 1), (2024, 2)]);
/// ```
pub fn month_range(since: NaiveDate, until: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut year, mut month) = (since.year(), since.month());
    let end = (until.year(), until.month());

    while (year, month) <= end {
        months.push((year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    months
}

/// Game timestamp: end time, else start time, as UTC.
pub fn game_timestamp(end_time: Option<i64>, start_time: Option<i64>) -> Option<DateTime<Utc>> {
    end_time
        .or(start_time)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
