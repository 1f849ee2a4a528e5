//! Year + ordinal-day code used as the file key in the processed archives.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::CalendarError;

/// Day-of-year code: the year followed by the 3-digit zero-padded ordinal
/// day (`YYYYJJJ`), e.g. `2024230` for 2024-08-17.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DoyCode {
    year: i32,
    ordinal: u16,
}

impl DoyCode {
    /// Builds the code for a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            // ordinal() is 1..=366, always fits.
            ordinal: date.ordinal() as u16,
        }
    }

    /// Returns the year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Returns the ordinal day (1..=366).
    pub fn ordinal(self) -> u16 {
        self.ordinal
    }

    /// The ordinal day alone, zero-padded to three digits.
    pub fn ordinal_str(self) -> String {
        format!("{:03}", self.ordinal)
    }

    /// Converts the code back into a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidDoyCode`] if the ordinal does not
    /// exist in that year (day 366 of a common year).
    pub fn to_date(self) -> Result<NaiveDate, CalendarError> {
        NaiveDate::from_yo_opt(self.year, u32::from(self.ordinal)).ok_or_else(|| {
            CalendarError::InvalidDoyCode {
                code: self.to_string(),
            }
        })
    }
}

impl fmt::Display for DoyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.year, self.ordinal)
    }
}

impl FromStr for DoyCode {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidDoyCode {
            code: s.to_string(),
        };
        if s.len() < 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let (year_str, ordinal_str) = s.split_at(s.len() - 3);
        let year: i32 = year_str.parse().map_err(|_| invalid())?;
        let ordinal: u16 = ordinal_str.parse().map_err(|_| invalid())?;
        let code = Self { year, ordinal };
        code.to_date().map_err(|_| invalid())?;
        Ok(code)
    }
}
