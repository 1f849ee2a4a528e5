//! Date parsing and horizon arithmetic.

use chrono::{Days, NaiveDate};

use crate::error::CalendarError;

/// Parses a date written as `YYYYMMDD` or `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDate`] if neither layout matches.
pub fn parse_date(s: &str) -> Result<NaiveDate, CalendarError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| CalendarError::InvalidDate {
            input: s.to_string(),
        })
}

/// Formats a date as `YYYYMMDD`.
pub fn format_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// The issue-cycle stamp used in forecast archive paths, `YYYYMMDD_HH`.
pub fn run_stamp(issue: NaiveDate, run_hour: u8) -> String {
    format!("{}_{:02}", format_compact(issue), run_hour)
}

/// Returns `issue + horizon` days.
///
/// # Errors
///
/// Returns [`CalendarError::Overflow`] if the result is not representable.
pub fn target_date(issue: NaiveDate, horizon: u32) -> Result<NaiveDate, CalendarError> {
    issue
        .checked_add_days(Days::new(u64::from(horizon)))
        .ok_or(CalendarError::Overflow {
            date: issue,
            days: horizon,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compact_and_dashed() {
        let expected = NaiveDate::from_ymd_opt(2024, 8, 16).unwrap();
        assert_eq!(parse_date("20240816").unwrap(), expected);
        assert_eq!(parse_date("2024-08-16").unwrap(), expected);
        assert_eq!(parse_date(" 2024-08-16 ").unwrap(), expected);
    }

    #[test]
    fn parse_rejects_invalid() {
        assert!(matches!(
            parse_date("2024-02-30"),
            Err(CalendarError::InvalidDate { .. })
        ));
        assert!(parse_date("16/08/2024").is_err());
    }

    #[test]
    fn run_stamp_pads_hour() {
        let d = NaiveDate::from_ymd_opt(2024, 8, 16).unwrap();
        assert_eq!(run_stamp(d, 0), "20240816_00");
        assert_eq!(run_stamp(d, 12), "20240816_12");
    }

    #[test]
    fn target_crosses_year_boundary() {
        let d = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(
            target_date(d, 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()
        );
    }

    #[test]
    fn target_zero_horizon_is_issue_date() {
        let d = NaiveDate::from_ymd_opt(2024, 8, 16).unwrap();
        assert_eq!(target_date(d, 0).unwrap(), d);
    }

    #[test]
    fn target_overflow() {
        assert!(matches!(
            target_date(NaiveDate::MAX, 1),
            Err(CalendarError::Overflow { .. })
        ));
    }
}
