//! Series command: per-date values at a point or area for one horizon.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use gwpm_evaluate::{SeriesTarget, point_series, to_json};
use gwpm_io::NetcdfLoader;

use crate::cli::SeriesArgs;
use crate::config::GwpmConfig;
use crate::convert;

/// Collect the series and write it as JSON.
pub fn run(args: SeriesArgs) -> Result<()> {
    let _cmd = info_span!("series", horizon = args.horizon).entered();
    let config = GwpmConfig::load(&args.run.config)?;
    let catalog = convert::build_catalog(&config)?;
    let loader = NetcdfLoader::new(convert::build_loader_config(&config.io));
    let series_cfg = convert::build_verify_config(&config, &args.run)?;

    let target = target(&args);
    let report = point_series(&catalog, &loader, &series_cfg, args.horizon, target)
        .context("point series failed")?;
    for (source, score) in &report.scores {
        info!(
            source = source.as_str(),
            n = score.n,
            rmse = ?score.rmse,
            correlation = ?score.correlation,
            "series scored"
        );
    }

    let json = to_json(&report)?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("failed to write series: {}", args.output.display()))?;
    info!(path = %args.output.display(), rows = report.rows.len(), "series written");
    Ok(())
}

/// A point when both coordinates are given, otherwise the area mean.
fn target(args: &SeriesArgs) -> SeriesTarget {
    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) if !args.area => SeriesTarget::Point { lat, lon },
        _ => SeriesTarget::AreaMean,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    use crate::cli::{Cli, Command};

    fn parse(argv: &[&str]) -> SeriesArgs {
        match Cli::parse_from(argv).command {
            Command::Series(args) => args,
            _ => panic!("expected series"),
        }
    }

    #[test]
    fn point_target_from_coordinates() {
        let args = parse(&["gwpm", "series", "--horizon", "3", "--lat", "41.3", "--lon", "69.2"]);
        assert_eq!(target(&args), SeriesTarget::Point { lat: 41.3, lon: 69.2 });
        assert_eq!(args.run.config.to_str(), Some("gwpm.toml"));
    }

    #[test]
    fn area_target_by_default() {
        let args = parse(&["gwpm", "-v", "series", "--horizon", "3", "--area"]);
        assert_eq!(target(&args), SeriesTarget::AreaMean);
    }

    #[test]
    fn lat_without_lon_rejected() {
        assert!(Cli::try_parse_from(["gwpm", "series", "--horizon", "1", "--lat", "40"]).is_err());
    }
}
