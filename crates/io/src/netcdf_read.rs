//! Low-level NetCDF extraction helpers.

use std::path::Path;

use netcdf::AttributeValue;

use crate::error::IoError;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read a 1-D `f64` variable, trying each alias in order.
///
/// Returns the data from the first alias that matches. If none match,
/// returns [`IoError::MissingVariable`] with the first alias as the name.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    for &alias in aliases {
        if let Some(var) = file.variable(alias) {
            return Ok(var.get_values::<f64, _>(..)?);
        }
    }

    let name = aliases.first().copied().unwrap_or("unknown");
    Err(IoError::MissingVariable {
        name: name.to_string(),
        path: path.to_path_buf(),
    })
}

/// A variable's dimensions and its decoded, row-major values.
#[derive(Debug)]
pub(crate) struct RawVariable {
    pub dims: Vec<(String, usize)>,
    pub data: Vec<f64>,
}

/// Read an n-D variable as `f64` and apply CF packing and missing-value
/// attributes.
pub(crate) fn read_variable(
    file: &netcdf::File,
    var_name: &str,
    path: &Path,
) -> Result<RawVariable, IoError> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| IoError::MissingVariable {
            name: var_name.to_string(),
            path: path.to_path_buf(),
        })?;

    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();

    let mut data = var.get_values::<f64, _>(..)?;
    let packing = CfPacking {
        fill_value: numeric_attribute(&var, "_FillValue"),
        missing_value: numeric_attribute(&var, "missing_value"),
        scale_factor: numeric_attribute(&var, "scale_factor"),
        add_offset: numeric_attribute(&var, "add_offset"),
    };
    packing.decode(&mut data);

    Ok(RawVariable { dims, data })
}

/// First numeric value of an attribute, if present and numeric.
fn numeric_attribute(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    let value = var.attribute_value(name)?.ok()?;
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Ints(v) => v.first().map(|&x| f64::from(x)),
        AttributeValue::Shorts(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

/// CF conventions for packed and masked data.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct CfPacking {
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
}

impl CfPacking {
    /// Mask fill and missing values to `NaN`, then unpack.
    ///
    /// Masking compares the raw stored values, before scaling.
    pub(crate) fn decode(&self, data: &mut [f64]) {
        let scale = self.scale_factor.unwrap_or(1.0);
        let offset = self.add_offset.unwrap_or(0.0);
        for v in data.iter_mut() {
            if self.is_masked(*v) {
                *v = f64::NAN;
            } else {
                *v = *v * scale + offset;
            }
        }
    }

    fn is_masked(&self, raw: f64) -> bool {
        [self.fill_value, self.missing_value]
            .into_iter()
            .flatten()
            .any(|m| raw == m || (m.is_nan() && raw.is_nan()))
    }
}
