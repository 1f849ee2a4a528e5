//! Records of data points a sweep could not score.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gwpm_io::IoError;
use serde::Serialize;
use tracing::{debug, warn};

/// Why a data point was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingFile,
    MissingVariable,
    Unreadable,
    NoValidCells,
    ShapeMismatch,
}

impl SkipReason {
    /// Classify a per-item I/O failure.
    pub fn from_io(err: &IoError) -> Self {
        match err {
            IoError::FileNotFound { .. } => Self::MissingFile,
            IoError::MissingVariable { .. } => Self::MissingVariable,
            IoError::ShapeMismatch { .. } => Self::ShapeMismatch,
            IoError::EmptySelection { .. } => Self::NoValidCells,
            IoError::Netcdf { .. }
            | IoError::MissingCoordinate { .. }
            | IoError::DimensionMismatch { .. }
            | IoError::InvalidRegion { .. } => Self::Unreadable,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::MissingVariable => "missing_variable",
            Self::Unreadable => "unreadable",
            Self::NoValidCells => "no_valid_cells",
            Self::ShapeMismatch => "shape_mismatch",
        }
    }
}

/// Which input of a (date, horizon) step was unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipRole {
    /// Skips every source for the (date, horizon).
    Reference,
    /// Skips every source for the (date, horizon).
    Climatology,
    /// Skips one source.
    Forecast,
}

/// One skipped (issue date, horizon, source).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipRecord {
    pub issue: NaiveDate,
    pub horizon: u32,
    pub role: SkipRole,
    /// Forecast source id; `None` for reference and climatology skips.
    pub source: Option<String>,
    /// Ensemble member, for member trajectories only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    pub reason: SkipReason,
    pub path: PathBuf,
    pub detail: String,
}

impl SkipRecord {
    /// Build a record and log it: missing files at `debug`, everything else
    /// at `warn`.
    pub(crate) fn new(
        issue: NaiveDate,
        horizon: u32,
        role: SkipRole,
        source: Option<&str>,
        reason: SkipReason,
        path: &Path,
        detail: String,
    ) -> Self {
        if reason == SkipReason::MissingFile {
            debug!(
                %issue, horizon, ?role, source, path = %path.display(),
                "skipping: file not found"
            );
        } else {
            warn!(
                %issue, horizon, ?role, source, reason = reason.label(), path = %path.display(),
                "skipping: {detail}"
            );
        }
        Self {
            issue,
            horizon,
            role,
            source: source.map(str::to_string),
            member: None,
            reason,
            path: path.to_path_buf(),
            detail,
        }
    }

    pub(crate) fn with_member(mut self, member: &str) -> Self {
        self.member = Some(member.to_string());
        self
    }
}
