//! Spatial selections: latitude/longitude boxes, area means, nearest point.

use ndarray::{Array3, Axis};

use crate::error::IoError;
use crate::grid::Grid;

/// A latitude/longitude box with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
}

impl Region {
    /// # Errors
    ///
    /// Returns [`IoError::InvalidRegion`] for non-finite bounds or a minimum
    /// above its maximum.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Result<Self, IoError> {
        if ![lat_min, lat_max, lon_min, lon_max]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(IoError::InvalidRegion {
                reason: "bounds must be finite".to_string(),
            });
        }
        if lat_min > lat_max {
            return Err(IoError::InvalidRegion {
                reason: format!("lat_min {lat_min} > lat_max {lat_max}"),
            });
        }
        if lon_min > lon_max {
            return Err(IoError::InvalidRegion {
                reason: format!("lon_min {lon_min} > lon_max {lon_max}"),
            });
        }
        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    pub fn lon_max(&self) -> f64 {
        self.lon_max
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }

    /// Cut `grid` down to the cells inside the box.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::EmptySelection`] if no latitude or no longitude
    /// falls inside.
    pub fn subset(&self, grid: &Grid) -> Result<Grid, IoError> {
        let rows: Vec<usize> = indices_within(grid.lats(), self.lat_min, self.lat_max);
        let cols: Vec<usize> = indices_within(grid.lons(), self.lon_min, self.lon_max);
        if rows.is_empty() || cols.is_empty() {
            return Err(IoError::EmptySelection {
                reason: format!("no grid cells inside {self}"),
            });
        }
        let values = grid
            .values()
            .select(Axis(1), &rows)
            .select(Axis(2), &cols);
        Grid::new(
            grid.dims().to_vec(),
            rows.iter().map(|&i| grid.lats()[i]).collect(),
            cols.iter().map(|&j| grid.lons()[j]).collect(),
            values,
        )
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lat [{}, {}] lon [{}, {}]",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

fn indices_within(coords: &[f64], min: f64, max: f64) -> Vec<usize> {
    coords
        .iter()
        .enumerate()
        .filter(|(_, c)| (min..=max).contains(*c))
        .map(|(i, _)| i)
        .collect()
}

/// Reduce every layer to its NaN-ignoring mean, giving a 1 × 1 grid located
/// at the mean coordinate. A layer with no finite cell becomes `NaN`.
///
/// # Errors
///
/// Returns [`IoError::EmptySelection`] if the grid has no coordinates.
pub fn area_mean(grid: &Grid) -> Result<Grid, IoError> {
    let layers = grid.n_layers();
    let mut out = Array3::from_elem((layers, 1, 1), f64::NAN);
    for k in 0..layers {
        let cells: Vec<f64> = grid.layer(k).iter().copied().collect();
        if let Some(m) = gwpm_stats::nan_mean(&cells) {
            out[[k, 0, 0]] = m;
        }
    }
    let lat = gwpm_stats::nan_mean(grid.lats()).ok_or_else(|| IoError::EmptySelection {
        reason: "grid has no latitudes".to_string(),
    })?;
    let lon = gwpm_stats::nan_mean(grid.lons()).ok_or_else(|| IoError::EmptySelection {
        reason: "grid has no longitudes".to_string(),
    })?;
    Grid::new(grid.dims().to_vec(), vec![lat], vec![lon], out)
}

/// The 1 × 1 grid at the cell nearest to (`lat`, `lon`).
///
/// # Errors
///
/// Returns [`IoError::EmptySelection`] if the grid has no coordinates.
pub fn nearest_point(grid: &Grid, lat: f64, lon: f64) -> Result<Grid, IoError> {
    let i = nearest_index(grid.lats(), lat).ok_or_else(|| IoError::EmptySelection {
        reason: "grid has no latitudes".to_string(),
    })?;
    let j = nearest_index(grid.lons(), lon).ok_or_else(|| IoError::EmptySelection {
        reason: "grid has no longitudes".to_string(),
    })?;
    let values = grid.values().select(Axis(1), &[i]).select(Axis(2), &[j]);
    Grid::new(
        grid.dims().to_vec(),
        vec![grid.lats()[i]],
        vec![grid.lons()[j]],
        values,
    )
}

fn nearest_index(coords: &[f64], x: f64) -> Option<usize> {
    coords
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_finite())
        .min_by(|(_, a), (_, b)| (*a - x).abs().total_cmp(&(*b - x).abs()))
        .map(|(i, _)| i)
}
