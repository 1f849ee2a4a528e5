//! Map command: per-cell RMSE of every model written to NetCDF.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use gwpm_evaluate::cell_map;
use gwpm_io::NetcdfLoader;

use crate::cli::MapArgs;
use crate::config::GwpmConfig;
use crate::convert;

/// Accumulate the per-cell map and write it.
pub fn run(args: MapArgs) -> Result<()> {
    let _cmd = info_span!("map").entered();
    let config = GwpmConfig::load(&args.run.config)?;
    let catalog = convert::build_catalog(&config)?;
    let loader = NetcdfLoader::new(convert::build_loader_config(&config.io));

    let mut map_cfg = convert::build_verify_config(&config, &args.run)?.with_area_mean(false);
    if let Some(horizons) = args.horizons {
        map_cfg = map_cfg.with_horizons(horizons);
    }

    let map = cell_map(&catalog, &loader, &map_cfg).context("per-cell map failed")?;
    info!(
        n_lat = map.lats.len(),
        n_lon = map.lons.len(),
        n_sources = map.sources.len(),
        n_skipped = map.skipped.len(),
        "map accumulated"
    );

    map.write(&args.output)
        .with_context(|| format!("failed to write map: {}", args.output.display()))?;
    info!(path = %args.output.display(), "map written");
    Ok(())
}
