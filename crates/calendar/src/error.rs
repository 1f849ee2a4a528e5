//! Error types for the gwpm-calendar crate.

use chrono::NaiveDate;

/// Error type for all fallible operations in the gwpm-calendar crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a date string matches none of the accepted layouts.
    #[error("invalid date '{input}' (expected YYYYMMDD or YYYY-MM-DD)")]
    InvalidDate {
        /// The string that failed to parse.
        input: String,
    },

    /// Returned when a day-of-year code is malformed or names a day the
    /// year does not have.
    #[error("invalid day-of-year code '{code}'")]
    InvalidDoyCode {
        /// The offending code.
        code: String,
    },

    /// Returned when adding a day offset leaves chrono's representable range.
    #[error("date overflow adding {days} days to {date}")]
    Overflow {
        /// Starting date.
        date: NaiveDate,
        /// Offset that was added.
        days: u32,
    },

    /// Returned when a date range ends before it starts.
    #[error("date range is empty: start {start} is after end {end}")]
    EmptyRange {
        /// First date of the range.
        start: NaiveDate,
        /// Last date of the range.
        end: NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_date() {
        let err = CalendarError::InvalidDate {
            input: "2024-13-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid date '2024-13-01' (expected YYYYMMDD or YYYY-MM-DD)"
        );
    }

    #[test]
    fn error_invalid_doy_code() {
        let err = CalendarError::InvalidDoyCode {
            code: "2023366".to_string(),
        };
        assert_eq!(err.to_string(), "invalid day-of-year code '2023366'");
    }

    #[test]
    fn error_empty_range() {
        let err = CalendarError::EmptyRange {
            start: NaiveDate::from_ymd_opt(2024, 8, 20).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 8, 16).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "date range is empty: start 2024-08-20 is after end 2024-08-16"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<CalendarError>();
    }
}
