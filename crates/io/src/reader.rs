//! High-level grid loading.

use std::path::Path;

use ndarray::Array3;
use tracing::debug;

use crate::error::IoError;
use crate::grid::Grid;
use crate::netcdf_read;

// ---------------------------------------------------------------------------
// LoaderConfig
// ---------------------------------------------------------------------------

/// How to recognise the horizontal dimensions of a variable.
///
/// The [`Default`] implementation covers the names used by common NWP and
/// reanalysis products.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Aliases to try when looking up the latitude dimension.
    lat_aliases: Vec<String>,
    /// Aliases to try when looking up the longitude dimension.
    lon_aliases: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            lat_aliases: vec!["lat".into(), "latitude".into(), "y".into()],
            lon_aliases: vec!["lon".into(), "longitude".into(), "x".into()],
        }
    }
}

impl LoaderConfig {
    /// Replace the latitude aliases.
    pub fn with_lat_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lat_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the longitude aliases.
    pub fn with_lon_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lon_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    fn is_lat(&self, name: &str) -> bool {
        self.lat_aliases.iter().any(|a| a == name)
    }

    fn is_lon(&self, name: &str) -> bool {
        self.lon_aliases.iter().any(|a| a == name)
    }
}

// ---------------------------------------------------------------------------
// GridLoader
// ---------------------------------------------------------------------------

/// Anything that can produce a [`Grid`] for a path and variable name.
///
/// The verification sweep is written against this trait so it can be
/// driven from NetCDF archives or from in-memory grids.
pub trait GridLoader: Send + Sync {
    /// Load `variable` from `path`.
    ///
    /// # Errors
    ///
    /// Implementations return [`IoError::FileNotFound`] when nothing exists
    /// at `path` and [`IoError::MissingVariable`] when the file lacks the
    /// variable.
    fn load(&self, path: &Path, variable: &str) -> Result<Grid, IoError>;
}

/// [`GridLoader`] backed by NetCDF files on disk.
#[derive(Debug, Clone, Default)]
pub struct NetcdfLoader {
    config: LoaderConfig,
}

impl NetcdfLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }
}

impl GridLoader for NetcdfLoader {
    fn load(&self, path: &Path, variable: &str) -> Result<Grid, IoError> {
        load_grid(path, variable, &self.config)
    }
}

// ---------------------------------------------------------------------------
// load_grid
// ---------------------------------------------------------------------------

/// Read one variable from a NetCDF file into a [`Grid`].
///
/// Singleton dimensions other than latitude and longitude are squeezed
/// away. What remains must be `(lat, lon)` or `(leading, lat, lon)`.
/// Coordinates are read from the coordinate variables named after the
/// latitude and longitude dimensions; fill and missing values become `NaN`
/// and CF packing is undone.
///
/// # Errors
///
/// - [`IoError::FileNotFound`] if nothing exists at `path`.
/// - [`IoError::MissingVariable`] if `variable` or a coordinate variable is
///   absent.
/// - [`IoError::MissingCoordinate`] if no dimension matches the aliases.
/// - [`IoError::DimensionMismatch`] if more than one non-singleton leading
///   dimension remains, latitude/longitude are not trailing, or a
///   coordinate variable has the wrong length.
pub fn load_grid(path: &Path, variable: &str, config: &LoaderConfig) -> Result<Grid, IoError> {
    let file = netcdf_read::open_file(path)?;
    let raw = netcdf_read::read_variable(&file, variable, path)?;

    let kept: Vec<(String, usize)> = raw
        .dims
        .into_iter()
        .filter(|(name, len)| *len != 1 || config.is_lat(name) || config.is_lon(name))
        .collect();

    let lat_pos = kept
        .iter()
        .position(|(name, _)| config.is_lat(name))
        .ok_or_else(|| IoError::MissingCoordinate {
            axis: "latitude",
            variable: variable.to_string(),
            path: path.to_path_buf(),
        })?;
    let lon_pos = kept
        .iter()
        .position(|(name, _)| config.is_lon(name))
        .ok_or_else(|| IoError::MissingCoordinate {
            axis: "longitude",
            variable: variable.to_string(),
            path: path.to_path_buf(),
        })?;

    let n = kept.len();
    if n > 3 {
        return Err(IoError::DimensionMismatch {
            name: format!("{variable} dimensions"),
            expected: 3,
            got: n,
        });
    }
    if lat_pos != n - 2 || lon_pos != n - 1 {
        return Err(IoError::DimensionMismatch {
            name: format!("{variable} lat/lon position"),
            expected: n - 2,
            got: lat_pos,
        });
    }

    let (lat_name, ny) = kept[n - 2].clone();
    let (lon_name, nx) = kept[n - 1].clone();
    let layers = if n == 3 { kept[0].1 } else { 1 };

    let lats = netcdf_read::read_1d_f64(&file, &[lat_name.as_str()], path)?;
    let lons = netcdf_read::read_1d_f64(&file, &[lon_name.as_str()], path)?;
    if lats.len() != ny {
        return Err(IoError::DimensionMismatch {
            name: lat_name,
            expected: ny,
            got: lats.len(),
        });
    }
    if lons.len() != nx {
        return Err(IoError::DimensionMismatch {
            name: lon_name,
            expected: nx,
            got: lons.len(),
        });
    }

    let values = Array3::from_shape_vec((layers, ny, nx), raw.data).map_err(|_| {
        IoError::ShapeMismatch {
            expected: vec![layers, ny, nx],
            got: kept.iter().map(|(_, len)| *len).collect(),
        }
    })?;

    let dims: Vec<String> = kept.into_iter().map(|(name, _)| name).collect();
    debug!(
        path = %path.display(),
        variable,
        dims = ?dims,
        layers,
        ny,
        nx,
        "loaded grid"
    );
    Grid::new(dims, lats, lons, values)
}
