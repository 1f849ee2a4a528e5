//! Putting a forecast grid on the reference grid's coordinates.

use std::borrow::Cow;

use ndarray::Array3;
use tracing::trace;

use crate::error::IoError;
use crate::grid::Grid;

/// Tolerance for treating a target coordinate as lying on a grid edge.
const EDGE_EPS: f64 = 1e-9;

/// Align `forecast` to `reference`.
///
/// If both grids already have the same dimension names and shape the
/// forecast is returned as is. Otherwise each forecast layer is bilinearly
/// interpolated onto the reference latitude/longitude coordinates. Targets
/// outside the forecast's coordinate range become `NaN`; a `NaN` corner
/// with non-zero weight makes the interpolated value `NaN`.
///
/// # Errors
///
/// Returns [`IoError::ShapeMismatch`] if the grids have different layer
/// counts.
pub fn align<'a>(forecast: &'a Grid, reference: &Grid) -> Result<Cow<'a, Grid>, IoError> {
    if forecast.is_aligned_with(reference) {
        return Ok(Cow::Borrowed(forecast));
    }
    if forecast.n_layers() != reference.n_layers() {
        return Err(IoError::ShapeMismatch {
            expected: reference.shape(),
            got: forecast.shape(),
        });
    }

    let lat_w: Vec<Option<Bracket>> = reference
        .lats()
        .iter()
        .map(|&y| Bracket::find(forecast.lats(), y))
        .collect();
    let lon_w: Vec<Option<Bracket>> = reference
        .lons()
        .iter()
        .map(|&x| Bracket::find(forecast.lons(), x))
        .collect();

    let layers = forecast.n_layers();
    let mut out = Array3::from_elem((layers, lat_w.len(), lon_w.len()), f64::NAN);
    for k in 0..layers {
        let src = forecast.layer(k);
        for (i, by) in lat_w.iter().enumerate() {
            let Some(by) = by else { continue };
            for (j, bx) in lon_w.iter().enumerate() {
                let Some(bx) = bx else { continue };
                let mut acc = 0.0;
                for (yi, wy) in by.corners() {
                    for (xi, wx) in bx.corners() {
                        let w = wy * wx;
                        if w > 0.0 {
                            acc += w * src[[yi, xi]];
                        }
                    }
                }
                out[[k, i, j]] = acc;
            }
        }
    }

    trace!(
        from = ?forecast.shape(),
        to = ?reference.shape(),
        "interpolated forecast onto reference grid"
    );
    Grid::new(
        reference.dims().to_vec(),
        reference.lats().to_vec(),
        reference.lons().to_vec(),
        out,
    )
    .map(Cow::Owned)
}

/// The two neighbouring indices of a target coordinate and the weight of
/// the upper one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bracket {
    lo: usize,
    hi: usize,
    frac: f64,
}

impl Bracket {
    /// Locate `x` in a monotonic coordinate vector, ascending or descending.
    fn find(coords: &[f64], x: f64) -> Option<Self> {
        let n = coords.len();
        if n == 0 || !x.is_finite() {
            return None;
        }
        if n == 1 {
            return ((coords[0] - x).abs() <= EDGE_EPS).then_some(Self {
                lo: 0,
                hi: 0,
                frac: 0.0,
            });
        }

        let ascending = coords[n - 1] >= coords[0];
        let (first, last) = (coords[0], coords[n - 1]);
        let (min, max) = if ascending { (first, last) } else { (last, first) };
        if x < min - EDGE_EPS || x > max + EDGE_EPS {
            return None;
        }
        let x = x.clamp(min, max);

        // Index of the first coordinate strictly past x in travel direction.
        let p = if ascending {
            coords.partition_point(|&c| c <= x)
        } else {
            coords.partition_point(|&c| c >= x)
        };
        let hi = p.clamp(1, n - 1);
        let lo = hi - 1;
        let span = coords[hi] - coords[lo];
        let frac = if span == 0.0 {
            0.0
        } else {
            (x - coords[lo]) / span
        };
        Some(Self { lo, hi, frac })
    }

    fn corners(&self) -> [(usize, f64); 2] {
        [(self.lo, 1.0 - self.frac), (self.hi, self.frac)]
    }
}
