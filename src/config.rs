use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level gwpm configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GwpmConfig {
    /// Forecast model archives, keyed by model id.
    #[serde(default)]
    pub models: BTreeMap<String, ModelToml>,

    /// Reference dataset archives, keyed by dataset id.
    #[serde(default)]
    pub references: BTreeMap<String, ReferenceToml>,

    /// Verified parameters, keyed by parameter id.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterToml>,

    /// Day-of-year climatology used for anomaly scores.
    #[serde(default)]
    pub climatology: Option<ClimatologyToml>,

    /// Grid loader settings.
    #[serde(default)]
    pub io: IoToml,

    /// What to verify.
    #[serde(default)]
    pub run: RunToml,
}

impl GwpmConfig {
    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    pub data_path: String,
    pub template: String,
    #[serde(default)]
    pub ensemble: Option<String>,
    #[serde(default)]
    pub run_hour: u8,
    #[serde(default = "default_max_horizon")]
    pub max_horizon: u32,
    /// Parameter id → variable name inside the files.
    pub variables: BTreeMap<String, String>,
}

fn default_max_horizon() -> u32 {
    15
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceToml {
    pub data_path: String,
    pub template: String,
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterToml {
    pub name: String,
    pub units: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Id of the reference dataset that is ground truth for this parameter.
    pub reference: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClimatologyToml {
    #[serde(default = "default_climatology_id")]
    pub id: String,
    pub data_path: String,
    pub template: String,
    pub variables: BTreeMap<String, String>,
}

fn default_climatology_id() -> String {
    "CLIM".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    #[serde(default = "default_lat_aliases")]
    pub lat_names: Vec<String>,
    #[serde(default = "default_lon_aliases")]
    pub lon_names: Vec<String>,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            lat_names: default_lat_aliases(),
            lon_names: default_lon_aliases(),
        }
    }
}

fn default_lat_aliases() -> Vec<String> {
    ["lat", "latitude", "y"].map(String::from).to_vec()
}
fn default_lon_aliases() -> Vec<String> {
    ["lon", "longitude", "x"].map(String::from).to_vec()
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RunToml {
    #[serde(default)]
    pub parameter: Option<String>,
    /// First issue date, `YYYYMMDD` or `YYYY-MM-DD`.
    #[serde(default)]
    pub start: Option<String>,
    /// Last issue date, inclusive.
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub horizons: Option<Vec<u32>>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub anomalies: bool,
    #[serde(default)]
    pub area_mean: bool,
    #[serde(default)]
    pub region: Option<RegionToml>,
    /// JSON report path for `verify`.
    #[serde(default)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionToml {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}
