//! gwpm evaluation: score forecast sources against a reference dataset over
//! a range of issue dates and lead times.
//!
//! The first three reports share one sweep:
//!
//! | Entry point | Output |
//! |-------------|--------|
//! | [`verify`] | horizon × source tables of average RMSE and correlation |
//! | [`cell_map`] | per-cell RMSE per source and the best source per cell |
//! | [`point_series`] | per-date values at one point or area, with temporal scores |
//! | [`member_series`] | per-horizon values of every ensemble member for one issue date |
//!
//! Data problems (missing files, missing variables, unreadable or empty
//! grids) never abort a run; they are collected as [`SkipRecord`]s.

mod accumulate;
mod cell_map;
mod config;
mod error;
mod members;
mod output;
mod score;
mod series;
mod skip;
mod sweep;
mod verify;

pub use accumulate::{Accumulator, MetricTable, Summary, Table, Tally};
pub use cell_map::{CellMap, cell_map};
pub use config::{DEFAULT_HORIZONS, VerifyConfig};
pub use error::EvaluateError;
pub use members::{MemberConfig, MemberReport, MemberRow, member_series};
pub use output::{RegionSummary, RunSummary, VerifyReport, to_json};
pub use score::{Scores, abs_error, anomaly, score_grids};
pub use series::{SeriesReport, SeriesRow, SeriesScore, SeriesTarget, point_series};
pub use skip::{SkipReason, SkipRecord, SkipRole};
pub use verify::verify;
