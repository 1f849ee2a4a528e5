//! # gwpm-calendar
//!
//! Date arithmetic for forecast verification on the proleptic Gregorian
//! calendar.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["issue date"] -->|"target_date(horizon)"| B["target date"]
//!     B -->|"DoyCode::from_date()"| C["DoyCode (YYYYJJJ)"]
//!     D["start..=end"] -->|"daily_sequence()"| E["Vec of issue dates"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use gwpm_calendar::{DoyCode, daily_sequence, parse_date, target_date};
//!
//! let issue = parse_date("20240816").unwrap();
//! let target = target_date(issue, 14).unwrap(); // 2024-08-30
//! assert_eq!(DoyCode::from_date(target).to_string(), "2024243");
//!
//! let issues = daily_sequence(issue, parse_date("2024-08-19").unwrap()).unwrap();
//! assert_eq!(issues.len(), 4);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `doy` | Year + ordinal-day file code |
//! | `date` | Parsing, horizon offsets, run-cycle stamps |
//! | `sequence` | Inclusive daily date ranges |
//! | `error` | Error types |

mod date;
mod doy;
mod error;
mod sequence;

pub use date::{format_compact, parse_date, run_stamp, target_date};
pub use doy::DoyCode;
pub use error::CalendarError;
pub use sequence::daily_sequence;
