//! # gwpm-io
//!
//! Read gridded forecast and reference fields from NetCDF files, put them
//! on a common grid, and write per-cell score maps back out.
//!
//! ```text
//! path ──load_grid──▶ Grid ──align──▶ Grid on reference coords
//!                                  └─▶ Region::subset / area_mean / nearest_point
//! ```

mod align;
mod error;
mod grid;
mod netcdf_read;
mod reader;
mod region;
mod writer;

pub use align::align;
pub use error::IoError;
pub use grid::Grid;
pub use reader::{GridLoader, LoaderConfig, NetcdfLoader, load_grid};
pub use region::{Region, area_mean, nearest_point};
pub use writer::{IndexLayer, MapFile, MapLayer, write_map};
