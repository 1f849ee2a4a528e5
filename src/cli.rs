use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gwpm forecast verification.
#[derive(Parser)]
#[command(
    name = "gwpm",
    version,
    about = "Verify NWP forecast models against gridded reference datasets"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Average RMSE and correlation per horizon and model.
    Verify(VerifyArgs),
    /// Per-cell RMSE of every model and the best model per cell.
    Map(MapArgs),
    /// Values and temporal scores at one point or area for a single horizon.
    Series(SeriesArgs),
    /// Every ensemble member of one model along the lead time, for one issue date.
    Members(MembersArgs),
}

/// Overrides of the `[run]` section shared by every subcommand.
#[derive(clap::Args, Debug, Default)]
pub struct RunArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "gwpm.toml")]
    pub config: PathBuf,

    /// Parameter to verify (e.g. Temp, P, RelHum, Wind).
    #[arg(short, long)]
    pub parameter: Option<String>,

    /// First issue date (YYYYMMDD or YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<String>,

    /// Last issue date, inclusive.
    #[arg(long)]
    pub end: Option<String>,

    /// Reference dataset to score against instead of the parameter's own.
    #[arg(long)]
    pub reference: Option<String>,

    /// Only score these models (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub sources: Option<Vec<String>>,

    /// Remove the configured climatology before scoring.
    #[arg(long)]
    pub anomalies: bool,
}

/// Arguments for the `verify` subcommand.
#[derive(clap::Args)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Lead times to score (comma separated); overrides `[run].horizons`.
    #[arg(long, value_delimiter = ',')]
    pub horizons: Option<Vec<u32>>,

    /// Compare area means over `[run.region]` instead of cells.
    #[arg(long)]
    pub area_mean: bool,

    /// Override JSON report path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `map` subcommand.
#[derive(clap::Args)]
pub struct MapArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Lead times to pool into the map (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub horizons: Option<Vec<u32>>,

    /// Path for the NetCDF map.
    #[arg(short, long, default_value = "rmse_map.nc")]
    pub output: PathBuf,
}

/// Arguments for the `series` subcommand.
#[derive(clap::Args)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Lead time, in days.
    #[arg(long)]
    pub horizon: u32,

    /// Latitude of the point; requires `--lon`.
    #[arg(long, requires = "lon", conflicts_with = "area")]
    pub lat: Option<f64>,

    /// Longitude of the point; requires `--lat`.
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,

    /// Use the area mean over `[run.region]` (or the full grid).
    #[arg(long)]
    pub area: bool,

    /// Path for the JSON series.
    #[arg(short, long, default_value = "series.json")]
    pub output: PathBuf,
}

/// Arguments for the `members` subcommand.
#[derive(clap::Args)]
pub struct MembersArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "gwpm.toml")]
    pub config: PathBuf,

    /// Forecast model whose members are read.
    #[arg(short, long)]
    pub source: String,

    /// Parameter to read; defaults to `[run].parameter`.
    #[arg(short, long)]
    pub parameter: Option<String>,

    /// Issue date (YYYYMMDD or YYYY-MM-DD).
    #[arg(long)]
    pub issue: String,

    /// Member labels as they appear in the path (comma separated), e.g. 001,002.
    #[arg(long, value_delimiter = ',', required = true)]
    pub members: Vec<String>,

    /// Lead times to read (comma separated); defaults to every one the model produces.
    #[arg(long, value_delimiter = ',')]
    pub horizons: Option<Vec<u32>>,

    /// Latitude of the point; requires `--lon`. Without a point the area mean is used.
    #[arg(long, requires = "lon")]
    pub lat: Option<f64>,

    /// Longitude of the point; requires `--lat`.
    #[arg(long, requires = "lat")]
    pub lon: Option<f64>,

    /// Path for the JSON trajectories.
    #[arg(short, long, default_value = "members.json")]
    pub output: PathBuf,
}
