//! NetCDF output for per-cell score maps.

use std::path::Path;

use ndarray::Array2;
use tracing::info;

use crate::error::IoError;

/// A floating-point map layer.
#[derive(Debug, Clone)]
pub struct MapLayer {
    /// Variable name in the output file.
    pub name: String,
    /// Written as the `long_name` attribute.
    pub long_name: String,
    /// Written as the `units` attribute when present.
    pub units: Option<String>,
    /// Values shaped `(lat, lon)`; `NaN` where undefined.
    pub values: Array2<f64>,
}

/// A categorical map layer of indices into `labels`; `-1` means none.
#[derive(Debug, Clone)]
pub struct IndexLayer {
    pub name: String,
    pub long_name: String,
    pub labels: Vec<String>,
    pub values: Array2<i32>,
}

/// Everything written to one map file.
#[derive(Debug, Clone, Default)]
pub struct MapFile {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
    pub layers: Vec<MapLayer>,
    pub index: Option<IndexLayer>,
    /// Global attributes.
    pub attributes: Vec<(String, String)>,
}

impl MapFile {
    fn validate(&self) -> Result<(), IoError> {
        let expected = vec![self.lats.len(), self.lons.len()];
        let shapes = self
            .layers
            .iter()
            .map(|l| l.values.shape().to_vec())
            .chain(self.index.iter().map(|l| l.values.shape().to_vec()));
        for got in shapes {
            if got != expected {
                return Err(IoError::ShapeMismatch {
                    expected: expected.clone(),
                    got,
                });
            }
        }
        Ok(())
    }
}

/// Write a map file with `lat`/`lon` coordinate variables and one
/// `(lat, lon)` variable per layer.
///
/// The index layer stores `-1` as its `_FillValue` and lists its labels in
/// a `flag_meanings` attribute, in index order.
///
/// # Errors
///
/// Returns [`IoError::ShapeMismatch`] if a layer does not match the
/// coordinates, or [`IoError::Netcdf`] on write failure.
pub fn write_map(path: &Path, map: &MapFile) -> Result<(), IoError> {
    map.validate()?;

    let mut file = netcdf::create(path)?;
    file.add_dimension("lat", map.lats.len())?;
    file.add_dimension("lon", map.lons.len())?;

    for (key, value) in &map.attributes {
        file.add_attribute(key, value.as_str())?;
    }

    {
        let mut var = file.add_variable::<f64>("lat", &["lat"])?;
        var.put_attribute("units", "degrees_north")?;
        var.put_values(&map.lats, ..)?;
    }
    {
        let mut var = file.add_variable::<f64>("lon", &["lon"])?;
        var.put_attribute("units", "degrees_east")?;
        var.put_values(&map.lons, ..)?;
    }

    for layer in &map.layers {
        let data: Vec<f64> = layer.values.iter().copied().collect();
        let mut var = file.add_variable::<f64>(&layer.name, &["lat", "lon"])?;
        var.put_attribute("long_name", layer.long_name.as_str())?;
        if let Some(units) = &layer.units {
            var.put_attribute("units", units.as_str())?;
        }
        var.put_values(&data, ..)?;
    }

    if let Some(index) = &map.index {
        let data: Vec<i32> = index.values.iter().copied().collect();
        let flag_values: Vec<i32> = (0..index.labels.len())
            .map(|i| i32::try_from(i).unwrap_or(i32::MAX))
            .collect();
        let mut var = file.add_variable::<i32>(&index.name, &["lat", "lon"])?;
        var.put_attribute("_FillValue", -1_i32)?;
        var.put_attribute("long_name", index.long_name.as_str())?;
        var.put_attribute("flag_values", flag_values)?;
        var.put_attribute("flag_meanings", index.labels.join(" "))?;
        var.put_values(&data, ..)?;
    }

    info!(
        path = %path.display(),
        layers = map.layers.len(),
        "wrote map"
    );
    Ok(())
}
