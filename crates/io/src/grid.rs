//! The in-memory grid type shared by loader, aligner and scorer.

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::error::IoError;

/// A latitude × longitude field, optionally stacked over one leading
/// dimension (time steps, members, levels).
///
/// Values are always stored as `(layers, lat, lon)`; a plain 2-D field has
/// one layer and two dimension names. `NaN` marks missing cells. Grids are
/// never modified in place: every transformation returns a new grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    dims: Vec<String>,
    lats: Vec<f64>,
    lons: Vec<f64>,
    values: Array3<f64>,
}

impl Grid {
    /// Build a grid, checking that names, coordinates and values agree.
    ///
    /// `dims` holds either `[lat, lon]` (values must have one layer) or
    /// `[leading, lat, lon]`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::ShapeMismatch`] if the coordinate lengths do not
    /// match the value array, or [`IoError::DimensionMismatch`] if `dims`
    /// has neither two nor three entries.
    pub fn new(
        dims: Vec<String>,
        lats: Vec<f64>,
        lons: Vec<f64>,
        values: Array3<f64>,
    ) -> Result<Self, IoError> {
        let (layers, ny, nx) = values.dim();
        match dims.len() {
            2 if layers == 1 => {}
            3 => {}
            n => {
                return Err(IoError::DimensionMismatch {
                    name: "dims".to_string(),
                    expected: if layers == 1 { 2 } else { 3 },
                    got: n,
                });
            }
        }
        if lats.len() != ny || lons.len() != nx {
            return Err(IoError::ShapeMismatch {
                expected: vec![ny, nx],
                got: vec![lats.len(), lons.len()],
            });
        }
        Ok(Self {
            dims,
            lats,
            lons,
            values,
        })
    }

    /// Build a single-layer grid with dimensions `lat`, `lon`.
    ///
    /// # Errors
    ///
    /// As [`Grid::new`].
    pub fn from_layer(lats: Vec<f64>, lons: Vec<f64>, values: Array2<f64>) -> Result<Self, IoError> {
        Self::new(
            vec!["lat".to_string(), "lon".to_string()],
            lats,
            lons,
            values.insert_axis(Axis(0)),
        )
    }

    /// Dimension names after squeezing.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Latitude coordinate values.
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitude coordinate values.
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// Values shaped `(layers, lat, lon)`.
    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    pub fn n_layers(&self) -> usize {
        self.values.len_of(Axis(0))
    }

    /// One layer as a `(lat, lon)` view.
    ///
    /// # Panics
    ///
    /// Panics if `k >= self.n_layers()`.
    pub fn layer(&self, k: usize) -> ArrayView2<'_, f64> {
        self.values.index_axis(Axis(0), k)
    }

    /// Shape of the squeezed array, one entry per dimension name.
    pub fn shape(&self) -> Vec<usize> {
        let (layers, ny, nx) = self.values.dim();
        if self.dims.len() == 2 {
            vec![ny, nx]
        } else {
            vec![layers, ny, nx]
        }
    }

    /// Whether both grids have the same dimension names and shape.
    pub fn is_aligned_with(&self, other: &Grid) -> bool {
        self.dims == other.dims && self.values.dim() == other.values.dim()
    }

    /// A grid on the same coordinates holding `values`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::ShapeMismatch`] if the shapes differ.
    pub fn with_values(&self, values: Array3<f64>) -> Result<Self, IoError> {
        if values.dim() != self.values.dim() {
            let (l, y, x) = values.dim();
            return Err(IoError::ShapeMismatch {
                expected: self.shape(),
                got: vec![l, y, x],
            });
        }
        Ok(Self {
            dims: self.dims.clone(),
            lats: self.lats.clone(),
            lons: self.lons.clone(),
            values,
        })
    }

    /// Values in row-major `(layer, lat, lon)` order.
    pub fn to_flat(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Number of finite cells.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn grid() -> Grid {
        Grid::from_layer(
            vec![10.0, 20.0],
            vec![0.0, 1.0, 2.0],
            array![[1.0, 2.0, f64::NAN], [4.0, 5.0, 6.0]],
        )
        .unwrap()
    }

    #[test]
    fn two_dimensional_shape() {
        let g = grid();
        assert_eq!(g.dims(), ["lat", "lon"]);
        assert_eq!(g.shape(), vec![2, 3]);
        assert_eq!(g.n_layers(), 1);
        assert_eq!(g.valid_count(), 5);
        assert_eq!(g.layer(0)[[1, 2]], 6.0);
    }

    #[test]
    fn coordinate_length_checked() {
        let err = Grid::from_layer(vec![10.0], vec![0.0, 1.0, 2.0], Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, IoError::ShapeMismatch { .. }));
    }

    #[test]
    fn two_names_require_one_layer() {
        let err = Grid::new(
            vec!["lat".into(), "lon".into()],
            vec![0.0],
            vec![0.0],
            Array3::zeros((2, 1, 1)),
        )
        .unwrap_err();
        assert!(matches!(err, IoError::DimensionMismatch { expected: 3, got: 2, .. }));
    }

    #[test]
    fn alignment_compares_names_and_shape() {
        let a = grid();
        let b = Grid::from_layer(vec![0.0, 1.0], vec![5.0, 6.0, 7.0], Array2::zeros((2, 3))).unwrap();
        assert!(a.is_aligned_with(&b));

        let c = Grid::new(
            vec!["latitude".into(), "longitude".into()],
            vec![0.0, 1.0],
            vec![5.0, 6.0, 7.0],
            Array3::zeros((1, 2, 3)),
        )
        .unwrap();
        assert!(!a.is_aligned_with(&c));
    }

    #[test]
    fn with_values_keeps_coordinates() {
        let a = grid();
        let b = a.with_values(Array3::ones((1, 2, 3))).unwrap();
        assert_eq!(b.lats(), a.lats());
        assert_eq!(b.valid_count(), 6);
        assert!(a.with_values(Array3::ones((1, 3, 2))).is_err());
    }
}
