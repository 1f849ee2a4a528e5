//! The date × horizon × source loop shared by every report.
//!
//! For each issue date and horizon the reference (and climatology) grid is
//! loaded once; the eligible forecast sources are then loaded, aligned and
//! measured on rayon's pool. Results are handed to the [`Visitor`] on the
//! sweep thread in source order, so visitor state has a single writer and
//! the outcome does not depend on scheduling.

use std::borrow::Cow;
use std::path::PathBuf;

use chrono::NaiveDate;
use gwpm_calendar::{daily_sequence, target_date};
use gwpm_catalog::{
    Catalog, CatalogError, ForecastRequest, Source, SourceKind, resolve, resolve_target,
};
use gwpm_io::{Grid, GridLoader, IoError, align};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::VerifyConfig;
use crate::error::EvaluateError;
use crate::score::anomaly;
use crate::skip::{SkipReason, SkipRecord, SkipRole};

/// Per-report behaviour plugged into [`run`].
pub(crate) trait Visitor: Sync {
    type Item: Send;

    /// Called once per (date, horizon) with the prepared reference, before
    /// any source. An error skips the whole step.
    fn on_reference(
        &mut self,
        _issue: NaiveDate,
        _horizon: u32,
        _reference: &Grid,
    ) -> Result<(), (SkipReason, String)> {
        Ok(())
    }

    /// Reduce one prepared forecast/reference pair. Runs on the pool.
    fn measure(&self, forecast: &Grid, reference: &Grid) -> Result<Self::Item, (SkipReason, String)>;

    /// Fold a measured item into the visitor's state.
    fn record(&mut self, issue: NaiveDate, horizon: u32, source: &str, item: Self::Item);
}

/// The validated inputs of a sweep, resolved against the catalog.
#[derive(Debug)]
pub(crate) struct Plan<'a> {
    pub parameter: &'a str,
    pub reference: &'a Source,
    pub climatology: Option<&'a Source>,
    /// Each requested horizon with the sources scored at it, in catalog order.
    pub horizons: Vec<(u32, Vec<&'a Source>)>,
    scored: Vec<&'a str>,
}

impl<'a> Plan<'a> {
    /// Validate `config` against `catalog`.
    ///
    /// Horizons beyond an explicitly listed source's maximum lead time are
    /// a configuration error; without a source list such sources are left
    /// out at that horizon.
    pub(crate) fn build(catalog: &'a Catalog, config: &'a VerifyConfig) -> Result<Self, EvaluateError> {
        let problems = config.problems();
        if !problems.is_empty() {
            return Err(EvaluateError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            });
        }

        let param = catalog.parameter(config.parameter())?;
        let parameter = param.id();
        let reference_id = config.reference().unwrap_or(param.reference());
        catalog.check_reference(parameter, reference_id)?;
        let reference = catalog.source(reference_id)?;

        let climatology = match config.climatology() {
            Some(id) => {
                let source = catalog.source(id)?;
                if source.kind() != &SourceKind::Climatology {
                    return Err(CatalogError::WrongKind {
                        source_id: id.to_string(),
                        expected: "climatology",
                        actual: source.kind().label(),
                    }
                    .into());
                }
                source.variable_name(parameter)?;
                Some(source)
            }
            None => None,
        };

        let explicit: Option<Vec<&Source>> = match config.sources() {
            Some(ids) => {
                for id in ids {
                    forecast_source(catalog, id, parameter)?;
                }
                Some(catalog.sources().filter(|s| ids.iter().any(|id| id == s.id())).collect())
            }
            None => None,
        };

        let mut horizons = Vec::with_capacity(config.horizons().len());
        for &h in config.horizons() {
            let sources = match &explicit {
                Some(list) => {
                    for s in list {
                        let max = s.max_horizon().unwrap_or(0);
                        if h > max {
                            return Err(CatalogError::HorizonOutOfRange {
                                source_id: s.id().to_string(),
                                horizon: h,
                                max,
                            }
                            .into());
                        }
                    }
                    list.clone()
                }
                None => catalog.eligible_sources(parameter, h),
            };
            if sources.is_empty() {
                return Err(EvaluateError::NoEligibleSource {
                    parameter: parameter.to_string(),
                    horizon: h,
                });
            }
            horizons.push((h, sources));
        }

        let scored = catalog
            .sources()
            .filter(|s| horizons.iter().any(|(_, list)| list.iter().any(|x| x.id() == s.id())))
            .map(Source::id)
            .collect();

        Ok(Self {
            parameter,
            reference,
            climatology,
            horizons,
            scored,
        })
    }

    /// Every scored source, in catalog order, without repeats.
    pub(crate) fn source_ids(&self) -> Vec<&'a str> {
        self.scored.clone()
    }
}

fn forecast_source<'a>(catalog: &'a Catalog, id: &str, parameter: &str) -> Result<&'a Source, EvaluateError> {
    let source = catalog.source(id)?;
    if !matches!(source.kind(), SourceKind::Forecast { .. }) {
        return Err(CatalogError::WrongKind {
            source_id: id.to_string(),
            expected: "forecast",
            actual: source.kind().label(),
        }
        .into());
    }
    source.variable_name(parameter)?;
    Ok(source)
}

/// The reference side of one (date, horizon) step.
struct Prepared {
    /// Alignment target for forecasts and climatology.
    full: Grid,
    /// Climatology on the reference grid.
    climatology: Option<Grid>,
    /// Reference after climatology removal and region cut.
    scored: Grid,
}

/// Bring an aligned grid into the scored form: climatology removed, then
/// cut to the region.
fn finish(grid: &Grid, climatology: Option<&Grid>, config: &VerifyConfig) -> Result<Grid, IoError> {
    let grid = match climatology {
        Some(c) => Cow::Owned(anomaly(grid, c)?),
        None => Cow::Borrowed(grid),
    };
    match config.region() {
        Some(region) => region.subset(&grid),
        None => Ok(grid.into_owned()),
    }
}

fn io_skip(err: &IoError) -> (SkipReason, String) {
    (SkipReason::from_io(err), err.to_string())
}

/// Sweep every issue date and horizon of `plan`, feeding `visitor`.
///
/// Returns the skip records in sweep order.
pub(crate) fn run<V: Visitor>(
    catalog: &Catalog,
    loader: &dyn GridLoader,
    config: &VerifyConfig,
    plan: &Plan<'_>,
    visitor: &mut V,
) -> Result<Vec<SkipRecord>, EvaluateError> {
    let mut skips = Vec::new();
    let dates = daily_sequence(config.start(), config.end())?;
    let parameter = plan.parameter;

    for issue in dates {
        info!(%issue, parameter, "verifying issue date");
        for (horizon, sources) in &plan.horizons {
            let horizon = *horizon;
            let target = target_date(issue, horizon)?;

            let reference =
                match prepare_reference(loader, config, plan, issue, horizon, target, visitor)? {
                    Ok(r) => r,
                    Err(skip) => {
                        skips.push(skip);
                        continue;
                    }
                };

            let shared: &V = visitor;
            let outcomes: Vec<(&str, PathBuf, Result<V::Item, (SkipReason, String)>)> = sources
                .par_iter()
                .map(|source| -> Result<_, EvaluateError> {
                    let request = ForecastRequest::new(source.id(), parameter, issue, horizon);
                    let resolved = resolve(catalog, &request)?;
                    let outcome = loader
                        .load(&resolved.path, &resolved.variable)
                        .and_then(|grid| {
                            let aligned = align(&grid, &reference.full)?;
                            finish(&aligned, reference.climatology.as_ref(), config)
                        })
                        .map_err(|e| io_skip(&e))
                        .and_then(|grid| shared.measure(&grid, &reference.scored));
                    Ok((source.id(), resolved.path, outcome))
                })
                .collect::<Result<_, EvaluateError>>()?;

            for (source, path, outcome) in outcomes {
                match outcome {
                    Ok(item) => {
                        debug!(%issue, horizon, source, "scored");
                        visitor.record(issue, horizon, source, item);
                    }
                    Err((reason, detail)) => skips.push(SkipRecord::new(
                        issue,
                        horizon,
                        SkipRole::Forecast,
                        Some(source),
                        reason,
                        &path,
                        detail,
                    )),
                }
            }
        }
    }

    info!(n_skipped = skips.len(), "sweep finished");
    Ok(skips)
}

/// Load the reference and climatology for one step.
///
/// The outer `Result` carries configuration errors; the inner one a skip.
fn prepare_reference<V: Visitor>(
    loader: &dyn GridLoader,
    config: &VerifyConfig,
    plan: &Plan<'_>,
    issue: NaiveDate,
    horizon: u32,
    target: NaiveDate,
    visitor: &mut V,
) -> Result<Result<Prepared, SkipRecord>, EvaluateError> {
    let resolved = resolve_target(plan.reference, plan.parameter, target)?;
    let skip = |role, (reason, detail): (SkipReason, String), path: &PathBuf| {
        SkipRecord::new(issue, horizon, role, None, reason, path, detail)
    };

    let full = match loader.load(&resolved.path, &resolved.variable) {
        Ok(g) => g,
        Err(e) => return Ok(Err(skip(SkipRole::Reference, io_skip(&e), &resolved.path))),
    };

    let climatology = match plan.climatology {
        Some(source) => {
            let c = resolve_target(source, plan.parameter, target)?;
            let aligned = loader
                .load(&c.path, &c.variable)
                .and_then(|grid| align(&grid, &full).map(Cow::into_owned));
            match aligned {
                Ok(g) => Some(g),
                Err(e) => return Ok(Err(skip(SkipRole::Climatology, io_skip(&e), &c.path))),
            }
        }
        None => None,
    };

    let scored = match finish(&full, climatology.as_ref(), config) {
        Ok(g) => g,
        Err(e) => return Ok(Err(skip(SkipRole::Reference, io_skip(&e), &resolved.path))),
    };
    if scored.valid_count() == 0 {
        let detail = "reference has no finite cells".to_string();
        return Ok(Err(skip(
            SkipRole::Reference,
            (SkipReason::NoValidCells, detail),
            &resolved.path,
        )));
    }
    if let Err(e) = visitor.on_reference(issue, horizon, &scored) {
        return Ok(Err(skip(SkipRole::Reference, e, &resolved.path)));
    }

    Ok(Ok(Prepared {
        full,
        climatology,
        scored,
    }))
}
