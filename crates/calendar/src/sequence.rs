//! Inclusive daily date ranges.

use chrono::NaiveDate;

use crate::error::CalendarError;

/// Every date from `start` to `end`, both inclusive, in daily steps.
///
/// # Errors
///
/// Returns [`CalendarError::EmptyRange`] if `start > end`.
///
/// # Example
///
/// ```ignore
/// let start = parse_date("2024-12-30").unwrap();
/// let dates = daily_sequence(start, parse_date("2025-01-02").unwrap()).unwrap();
/// // Dec 30, Dec 31, Jan 1 (2025), Jan 2 (2025)
/// assert_eq!(dates.len(), 4);
/// ```
pub fn daily_sequence(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, CalendarError> {
    if start > end {
        return Err(CalendarError::EmptyRange { start, end });
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}
