//! Verify command: horizon × model tables of average RMSE and correlation.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use gwpm_evaluate::{Summary, VerifyReport, to_json, verify};
use gwpm_io::NetcdfLoader;

use crate::cli::VerifyArgs;
use crate::config::GwpmConfig;
use crate::convert;

/// Run the verification sweep and write the JSON report.
pub fn run(args: VerifyArgs) -> Result<()> {
    let _cmd = info_span!("verify").entered();
    let config = GwpmConfig::load(&args.run.config)?;
    let catalog = convert::build_catalog(&config)?;
    let loader = NetcdfLoader::new(convert::build_loader_config(&config.io));

    let mut verify_cfg = convert::build_verify_config(&config, &args.run)?;
    if let Some(horizons) = args.horizons {
        verify_cfg = verify_cfg.with_horizons(horizons);
    }
    if args.area_mean {
        verify_cfg = verify_cfg.with_area_mean(true);
    }

    info!(
        parameter = verify_cfg.parameter(),
        start = %verify_cfg.start(),
        end = %verify_cfg.end(),
        "starting verification"
    );
    let report = verify(&catalog, &loader, &verify_cfg).context("verification failed")?;

    if !report.skipped.is_empty() {
        warn!(n_skipped = report.skipped.len(), "some inputs were skipped");
    }
    print!("{}", format_table(&report));

    let path = args
        .output
        .or_else(|| config.run.output.clone())
        .unwrap_or_else(|| PathBuf::from(format!("verify_{}.json", report.run.parameter)));
    let json = to_json(&report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    info!(path = %path.display(), "report written");

    Ok(())
}

/// Plain-text table: one row per horizon, one `rmse / r` column per model.
fn format_table(report: &VerifyReport) -> String {
    let sources = &report.run.sources;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) vs {}",
        report.run.parameter_name, report.run.units, report.run.reference
    );
    let _ = write!(out, "{:>7}", "horizon");
    for s in sources {
        let _ = write!(out, " {s:>19}");
    }
    out.push('\n');

    for (h, cells) in &report.rmse {
        let _ = write!(out, "{h:>7}");
        for s in sources {
            let rmse = cells.get(s).copied();
            let corr = report.correlation.get(h).and_then(|c| c.get(s)).copied();
            let _ = write!(out, " {:>19}", format!("{} / {}", cell(rmse), cell(corr)));
        }
        out.push('\n');
    }
    out
}

fn cell(summary: Option<Summary>) -> String {
    match summary.and_then(|s| s.mean) {
        Some(v) => format!("{v:.3}"),
        None => "-".to_string(),
    }
}
