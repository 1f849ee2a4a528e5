//! Members command: ensemble trajectories of one model for one issue date.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use gwpm_calendar::parse_date;
use gwpm_evaluate::{MemberConfig, SeriesTarget, member_series, to_json};
use gwpm_io::NetcdfLoader;

use crate::cli::MembersArgs;
use crate::config::GwpmConfig;
use crate::convert;

/// Read every requested member and write the trajectories as JSON.
pub fn run(args: MembersArgs) -> Result<()> {
    let _cmd = info_span!("members", source = args.source.as_str()).entered();
    let config = GwpmConfig::load(&args.config)?;
    let catalog = convert::build_catalog(&config)?;
    let loader = NetcdfLoader::new(convert::build_loader_config(&config.io));

    let member_cfg = build_member_config(&config, &args)?;
    let target = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => SeriesTarget::Point { lat, lon },
        _ => SeriesTarget::AreaMean,
    };
    let report = member_series(&catalog, &loader, &member_cfg, target)
        .context("member trajectories failed")?;

    let json = to_json(&report)?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("failed to write members: {}", args.output.display()))?;
    info!(path = %args.output.display(), n_skipped = report.skipped.len(), "members written");
    Ok(())
}

fn build_member_config(config: &GwpmConfig, args: &MembersArgs) -> Result<MemberConfig> {
    let Some(parameter) = args.parameter.as_ref().or(config.run.parameter.as_ref()) else {
        bail!("no parameter: set [run].parameter in config or use --parameter");
    };
    let issue = parse_date(&args.issue).context("invalid issue date")?;
    let mut cfg = MemberConfig::new(&args.source, parameter, issue, &args.members);
    if let Some(ref horizons) = args.horizons {
        cfg = cfg.with_horizons(horizons.iter().copied());
    }
    if let Some(ref region) = config.run.region {
        cfg = cfg.with_region(convert::build_region(region)?);
    }
    Ok(cfg)
}
