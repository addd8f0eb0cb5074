//! Closed-market calendar.
//!
//! Holidays are configured as a comma-separated list of `YYYY-MM-DD` dates.
//! The orchestrator exits early when the current venue date is listed.

use chrono::NaiveDate;
use tracing::warn;

/// Parse a comma-separated date list. Malformed entries are skipped with a
/// warning rather than failing the whole configuration.
#[must_use]
pub fn parse_special_dates(raw: &str) -> Vec<NaiveDate> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(err) => {
                warn!(entry = %s, %err, "Skipping malformed special date");
                None
            }
        })
        .collect()
}

/// Whether `today` is a configured market holiday.
#[must_use]
pub fn is_special_date(dates: &[NaiveDate], today: NaiveDate) -> bool {
    dates.contains(&today)
}
