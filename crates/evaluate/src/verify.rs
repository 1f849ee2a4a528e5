//! Horizon × source tables of average RMSE and correlation.

use chrono::NaiveDate;
use gwpm_catalog::Catalog;
use gwpm_io::{Grid, GridLoader, area_mean};

use crate::accumulate::Accumulator;
use crate::config::VerifyConfig;
use crate::error::EvaluateError;
use crate::output::{RunSummary, VerifyReport};
use crate::score::{Scores, score_grids};
use crate::skip::SkipReason;
use crate::sweep::{self, Plan, Visitor};

struct MetricVisitor {
    area_mean: bool,
    acc: Accumulator,
}

impl Visitor for MetricVisitor {
    type Item = Scores;

    fn on_reference(
        &mut self,
        _issue: NaiveDate,
        horizon: u32,
        _reference: &Grid,
    ) -> Result<(), (SkipReason, String)> {
        self.acc.reference_loaded(horizon);
        Ok(())
    }

    fn measure(&self, forecast: &Grid, reference: &Grid) -> Result<Scores, (SkipReason, String)> {
        let io = |e: gwpm_io::IoError| (SkipReason::from_io(&e), e.to_string());
        let scores = if self.area_mean {
            score_grids(&area_mean(forecast).map_err(io)?, &area_mean(reference).map_err(io)?)
        } else {
            score_grids(forecast, reference)
        }
        .map_err(io)?;
        if scores.rmse.is_none() {
            return Err((
                SkipReason::NoValidCells,
                "no cell where forecast and reference are both finite".to_string(),
            ));
        }
        Ok(scores)
    }

    fn record(&mut self, _issue: NaiveDate, horizon: u32, source: &str, item: Scores) {
        self.acc.rmse.accumulate(horizon, source, item.rmse);
        self.acc.correlation.accumulate(horizon, source, item.correlation);
    }
}

/// Score every eligible source at every horizon over the configured issue
/// dates and average the per-item RMSE and correlation.
///
/// A missing reference (or climatology) skips the (date, horizon) for all
/// sources; a missing forecast skips only that source. Averages are over
/// the items that produced a defined value; a cell that never did is
/// reported as `None`.
///
/// # Errors
///
/// Configuration problems only: invalid dates or horizons, unknown or
/// ill-typed sources, a horizon no source reaches.
pub fn verify(
    catalog: &Catalog,
    loader: &dyn GridLoader,
    config: &VerifyConfig,
) -> Result<VerifyReport, EvaluateError> {
    let plan = Plan::build(catalog, config)?;

    let mut visitor = MetricVisitor {
        area_mean: config.area_mean(),
        acc: Accumulator::new(),
    };
    for (h, sources) in &plan.horizons {
        for s in sources {
            visitor.acc.register(*h, s.id());
        }
    }

    let skipped = sweep::run(catalog, loader, config, &plan, &mut visitor)?;
    let acc = visitor.acc;

    Ok(VerifyReport {
        run: RunSummary::new(catalog, config, &plan)?,
        rmse: acc.rmse.finalize(),
        correlation: acc.correlation.finalize(),
        raw: acc,
        skipped,
    })
}
