//! Shared fixtures: a small catalog and an in-memory grid loader.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use gwpm_catalog::{
    Catalog, ForecastRequest, Parameter, Source, resolve, resolve_member, resolve_target,
};
use gwpm_io::{Grid, GridLoader, IoError};
use ndarray::Array2;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// GEFS (10 days), ICON (7 days), an ERA5 reference and a climatology.
pub fn catalog() -> Catalog {
    let gefs = Source::forecast(
        "GEFS",
        "/mem/GEFS",
        "{base_path}/{parameter}/{date_time}/{ensemble}/Daily/{file_name}.nc",
    )
    .unwrap()
    .with_ensemble("01")
    .with_max_horizon(10)
    .with_variable("Temp", "t2m");
    let icon = Source::forecast(
        "ICON",
        "/mem/ICON",
        "{base_path}/{parameter}/{date_time}/Daily/{file_name}.nc",
    )
    .unwrap()
    .with_max_horizon(7)
    .with_variable("Temp", "t2m");
    let era5 = Source::reference("ERA5", "/mem/ERA5", "{base_path}/{parameter}/Daily/{file_name}.nc")
        .unwrap()
        .with_variable("Temp", "t2m");
    let clim = Source::climatology("CLIM", "/mem/clim", "{base_path}/{parameter}/doy_{doy}.nc")
        .unwrap()
        .with_variable("Temp", "t2m");

    Catalog::new(
        vec![gefs, icon, era5, clim],
        vec![Parameter::new("Temp", "Temperature", "K", "ERA5")],
    )
    .unwrap()
}

pub fn grid(values: Array2<f64>) -> Grid {
    let (ny, nx) = values.dim();
    Grid::from_layer(
        (0..ny).map(|i| 40.0 + i as f64).collect(),
        (0..nx).map(|j| 70.0 + j as f64).collect(),
        values,
    )
    .unwrap()
}

pub fn constant(value: f64) -> Grid {
    grid(Array2::from_elem((2, 2), value))
}

/// Grids keyed by path and variable, with a log of every load.
#[derive(Default)]
pub struct MemoryLoader {
    files: BTreeMap<PathBuf, BTreeMap<String, Grid>>,
    pub loads: Mutex<Vec<PathBuf>>,
}

impl MemoryLoader {
    pub fn insert(&mut self, path: PathBuf, variable: &str, grid: Grid) {
        self.files
            .entry(path)
            .or_default()
            .insert(variable.to_string(), grid);
    }

    /// Store a forecast where the catalog will look for it.
    pub fn forecast(&mut self, catalog: &Catalog, source: &str, issue: NaiveDate, horizon: u32, g: Grid) {
        let r = resolve(catalog, &ForecastRequest::new(source, "Temp", issue, horizon)).unwrap();
        self.insert(r.path, &r.variable, g);
    }

    /// Store the grid of one ensemble member.
    pub fn member(
        &mut self,
        catalog: &Catalog,
        source: &str,
        member: &str,
        issue: NaiveDate,
        horizon: u32,
        g: Grid,
    ) {
        let request = ForecastRequest::new(source, "Temp", issue, horizon);
        let r = resolve_member(catalog, &request, member).unwrap();
        self.insert(r.path, &r.variable, g);
    }

    /// Store a reference or climatology grid for a target date.
    pub fn target(&mut self, catalog: &Catalog, source: &str, target: NaiveDate, g: Grid) {
        let s = catalog.source(source).unwrap();
        let r = resolve_target(s, "Temp", target).unwrap();
        self.insert(r.path, &r.variable, g);
    }

    /// A file that exists but holds a different variable.
    pub fn wrong_variable(&mut self, catalog: &Catalog, source: &str, issue: NaiveDate, horizon: u32) {
        let r = resolve(catalog, &ForecastRequest::new(source, "Temp", issue, horizon)).unwrap();
        self.insert(r.path, "other", constant(0.0));
    }
}

impl GridLoader for MemoryLoader {
    fn load(&self, path: &Path, variable: &str) -> Result<Grid, IoError> {
        if let Ok(mut loads) = self.loads.lock() {
            loads.push(path.to_path_buf());
        }
        let vars = self.files.get(path).ok_or_else(|| IoError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        vars.get(variable)
            .cloned()
            .ok_or_else(|| IoError::MissingVariable {
                name: variable.to_string(),
                path: path.to_path_buf(),
            })
    }
}
