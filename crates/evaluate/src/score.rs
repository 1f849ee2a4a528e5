//! Grid-level scoring on top of `gwpm-stats`.

use gwpm_io::{Grid, IoError};
use ndarray::Array3;
use serde::Serialize;

/// RMSE and Pearson correlation of one forecast/reference pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    pub rmse: Option<f64>,
    pub correlation: Option<f64>,
    /// Cells where both grids were finite.
    pub n_valid: usize,
}

fn check_shapes(a: &Grid, b: &Grid) -> Result<(), IoError> {
    if a.values().dim() != b.values().dim() {
        return Err(IoError::ShapeMismatch {
            expected: b.shape(),
            got: a.shape(),
        });
    }
    Ok(())
}

/// Score an aligned forecast against the reference over every layer and
/// cell.
///
/// # Errors
///
/// Returns [`IoError::ShapeMismatch`] if the grids are not aligned.
pub fn score_grids(forecast: &Grid, reference: &Grid) -> Result<Scores, IoError> {
    check_shapes(forecast, reference)?;
    let f = forecast.to_flat();
    let r = reference.to_flat();
    Ok(Scores {
        rmse: gwpm_stats::rmse(&f, &r),
        correlation: gwpm_stats::pearson_correlation(&f, &r),
        n_valid: gwpm_stats::finite_pairs(&f, &r).len(),
    })
}

/// `grid - climatology`, cell by cell.
///
/// # Errors
///
/// Returns [`IoError::ShapeMismatch`] if the grids are not aligned.
pub fn anomaly(grid: &Grid, climatology: &Grid) -> Result<Grid, IoError> {
    check_shapes(grid, climatology)?;
    grid.with_values(grid.values() - climatology.values())
}

/// `|forecast - reference|` per cell; `NaN` where either is missing.
///
/// # Errors
///
/// Returns [`IoError::ShapeMismatch`] if the grids are not aligned.
pub fn abs_error(forecast: &Grid, reference: &Grid) -> Result<Grid, IoError> {
    check_shapes(forecast, reference)?;
    let diff: Array3<f64> = (forecast.values() - reference.values()).mapv(f64::abs);
    reference.with_values(diff)
}
