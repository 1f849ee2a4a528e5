//! # gwpm-catalog
//!
//! The static description of where forecast and reference grids live, and
//! the pure function that turns a forecast request into a file path.
//!
//! A [`Catalog`] is built once at startup from [`Source`] and [`Parameter`]
//! definitions, validated as a whole, and then only read. Path templates are
//! parsed into [`PathTemplate`] segments at build time so that resolution is
//! a structured substitution, never text search-and-replace.
//!
//! ```ignore
//! use gwpm_catalog::{Catalog, ForecastRequest, Parameter, Source, resolve};
//!
//! let gefs = Source::forecast("GEFS", "/data/GEFS", "{base_path}/{parameter}/{date_time}/{ensemble}/Daily/{file_name}.nc")?
//!     .with_ensemble("01")
//!     .with_max_horizon(10)
//!     .with_variable("Temp", "air_temperature");
//! let era5 = Source::reference("ERA5", "/data/ERA5_HRES", "{base_path}/{parameter}/Daily/{file_name}.nc")?
//!     .with_variable("Temp", "air_temperature");
//! let temp = Parameter::new("Temp", "Temperature", "K", "ERA5");
//! let catalog = Catalog::new(vec![gefs, era5], vec![temp])?;
//!
//! let request = ForecastRequest::new("GEFS", "Temp", issue, 3);
//! let resolved = resolve(&catalog, &request)?;
//! ```

mod catalog;
mod error;
mod parameter;
mod resolve;
mod source;
mod template;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use parameter::Parameter;
pub use resolve::{ForecastRequest, ResolvedPath, resolve, resolve_member, resolve_target};
pub use source::{Source, SourceKind};
pub use template::{PathTemplate, Placeholder, TemplateValues};
