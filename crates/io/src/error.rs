//! Error types for gwpm-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the gwpm-io crate.
///
/// [`IoError::FileNotFound`] and [`IoError::MissingVariable`] are the two
/// "data not there" conditions a verification sweep skips over; the rest
/// mean a file exists but cannot be turned into a usable grid.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when a required variable is not present in a file.
    #[error("variable '{name}' not found in {}", path.display())]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when no dimension of a variable matches the latitude or
    /// longitude aliases.
    #[error("no {axis} dimension on '{variable}' in {}", path.display())]
    MissingCoordinate {
        /// `"latitude"` or `"longitude"`.
        axis: &'static str,
        /// Variable that was inspected.
        variable: String,
        /// Path to the file.
        path: PathBuf,
    },

    /// Returned when a dimension has an unexpected size or position.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when two grids or a grid and its coordinates disagree.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// Returned for a region with non-finite or inverted bounds.
    #[error("invalid region: {reason}")]
    InvalidRegion {
        /// What is wrong with the bounds.
        reason: String,
    },

    /// Returned when a selection leaves no grid cells.
    #[error("empty selection: {reason}")]
    EmptySelection {
        /// Which selection came up empty.
        reason: String,
    },
}

impl From<netcdf::Error> for IoError {
    fn from(e: netcdf::Error) -> Self {
        IoError::Netcdf {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.nc");
    }

    #[test]
    fn display_netcdf() {
        let err = IoError::Netcdf {
            reason: "bad header".to_string(),
        };
        assert_eq!(err.to_string(), "netcdf error: bad header");
    }

    #[test]
    fn display_missing_variable() {
        let err = IoError::MissingVariable {
            name: "air_temperature".to_string(),
            path: PathBuf::from("/data/2024230.nc"),
        };
        assert_eq!(
            err.to_string(),
            "variable 'air_temperature' not found in /data/2024230.nc"
        );
    }

    #[test]
    fn display_missing_coordinate() {
        let err = IoError::MissingCoordinate {
            axis: "latitude",
            variable: "precipitation".to_string(),
            path: PathBuf::from("/data/p.nc"),
        };
        assert_eq!(
            err.to_string(),
            "no latitude dimension on 'precipitation' in /data/p.nc"
        );
    }

    #[test]
    fn display_dimension_mismatch() {
        let err = IoError::DimensionMismatch {
            name: "lat".to_string(),
            expected: 181,
            got: 180,
        };
        assert_eq!(
            err.to_string(),
            "dimension 'lat' mismatch: expected 181, got 180"
        );
    }

    #[test]
    fn display_shape_mismatch() {
        let err = IoError::ShapeMismatch {
            expected: vec![2, 3, 4],
            got: vec![3, 4],
        };
        assert_eq!(err.to_string(), "shape mismatch: expected [2, 3, 4], got [3, 4]");
    }

    #[test]
    fn display_region_errors() {
        let err = IoError::InvalidRegion {
            reason: "lat_min > lat_max".to_string(),
        };
        assert_eq!(err.to_string(), "invalid region: lat_min > lat_max");
        let err = IoError::EmptySelection {
            reason: "no cells in region".to_string(),
        };
        assert_eq!(err.to_string(), "empty selection: no cells in region");
    }

    #[test]
    fn from_netcdf_error() {
        let nc_err = netcdf::Error::Str("test nc error".to_string());
        let err: IoError = nc_err.into();
        assert!(matches!(err, IoError::Netcdf { .. }));
        assert!(err.to_string().contains("test nc error"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
