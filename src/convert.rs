//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use crate::cli::RunArgs;
use crate::config::*;

use gwpm_calendar::parse_date;
use gwpm_catalog::{Catalog, Parameter, Source};
use gwpm_evaluate::VerifyConfig;
use gwpm_io::{LoaderConfig, Region};

/// Builds the immutable [`Catalog`]: models first, then references, then
/// the climatology if one is configured.
pub fn build_catalog(config: &GwpmConfig) -> Result<Catalog> {
    let mut sources = Vec::new();
    for (id, m) in &config.models {
        let mut source = Source::forecast(id, &m.data_path, &m.template)
            .with_context(|| format!("model {id}"))?
            .with_run_hour(m.run_hour)
            .with_max_horizon(m.max_horizon);
        if let Some(ref member) = m.ensemble {
            source = source.with_ensemble(member);
        }
        sources.push(with_variables(source, &m.variables));
    }
    for (id, r) in &config.references {
        let source = Source::reference(id, &r.data_path, &r.template)
            .with_context(|| format!("reference {id}"))?;
        sources.push(with_variables(source, &r.variables));
    }
    if let Some(ref c) = config.climatology {
        let source = Source::climatology(&c.id, &c.data_path, &c.template)
            .context("climatology")?;
        sources.push(with_variables(source, &c.variables));
    }

    let parameters = config
        .parameters
        .iter()
        .map(|(id, p)| {
            let param = Parameter::new(id, &p.name, &p.units, &p.reference);
            match p.description {
                Some(ref d) => param.with_description(d),
                None => param,
            }
        })
        .collect();

    Catalog::new(sources, parameters).context("invalid source catalog")
}

fn with_variables(
    source: Source,
    variables: &std::collections::BTreeMap<String, String>,
) -> Source {
    variables
        .iter()
        .fold(source, |s, (param, var)| s.with_variable(param, var))
}

/// Builds a [`LoaderConfig`] from the TOML `[io]` section.
pub fn build_loader_config(io: &IoToml) -> LoaderConfig {
    LoaderConfig::default()
        .with_lat_aliases(&io.lat_names)
        .with_lon_aliases(&io.lon_names)
}

/// Builds a [`Region`] from the TOML `[run.region]` section.
pub fn build_region(r: &RegionToml) -> Result<Region> {
    Region::new(r.lat_min, r.lat_max, r.lon_min, r.lon_max).context("invalid [run.region]")
}

/// Builds a [`VerifyConfig`] from `[run]`, with command-line values taking
/// precedence.
///
/// Horizons and area-mean scoring are left to the subcommand.
pub fn build_verify_config(config: &GwpmConfig, args: &RunArgs) -> Result<VerifyConfig> {
    let run = &config.run;
    let Some(parameter) = args.parameter.as_ref().or(run.parameter.as_ref()) else {
        bail!("no parameter: set [run].parameter in config or use --parameter");
    };
    let start = pick_date("start", args.start.as_deref(), run.start.as_deref())?;
    let end = pick_date("end", args.end.as_deref(), run.end.as_deref())?;

    let mut cfg = VerifyConfig::new(parameter, start, end);
    if let Some(ref horizons) = run.horizons {
        cfg = cfg.with_horizons(horizons.iter().copied());
    }
    if let Some(sources) = args.sources.as_ref().or(run.sources.as_ref()) {
        cfg = cfg.with_sources(sources);
    }
    if let Some(reference) = args.reference.as_ref().or(run.reference.as_ref()) {
        cfg = cfg.with_reference(reference);
    }
    if args.anomalies || run.anomalies {
        let Some(ref clim) = config.climatology else {
            bail!("anomaly scores need a [climatology] section");
        };
        cfg = cfg.with_climatology(&clim.id);
    }
    if let Some(ref region) = run.region {
        cfg = cfg.with_region(build_region(region)?);
    }
    Ok(cfg.with_area_mean(run.area_mean))
}

fn pick_date(name: &str, cli: Option<&str>, toml: Option<&str>) -> Result<NaiveDate> {
    let Some(s) = cli.or(toml) else {
        bail!("no {name} date: set [run].{name} in config or use --{name}");
    };
    parse_date(s).with_context(|| format!("invalid {name} date"))
}
