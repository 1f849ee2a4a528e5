//! Time series at one point or region, for one horizon.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use gwpm_calendar::target_date;
use gwpm_catalog::Catalog;
use gwpm_io::{Grid, GridLoader, area_mean, nearest_point};
use serde::Serialize;

use crate::config::VerifyConfig;
use crate::error::EvaluateError;
use crate::output::RunSummary;
use crate::skip::{SkipReason, SkipRecord};
use crate::sweep::{self, Plan, Visitor};

/// Where the series is taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesTarget {
    /// The grid cell nearest to this location.
    Point { lat: f64, lon: f64 },
    /// The NaN-ignoring mean over the configured region, or the whole grid.
    AreaMean,
}

impl SeriesTarget {
    /// Reduce a grid to one value: the target cell or area mean, averaged
    /// over layers.
    pub(crate) fn reduce(self, grid: &Grid) -> Result<f64, (SkipReason, String)> {
        let reduced = match self {
            Self::Point { lat, lon } => nearest_point(grid, lat, lon),
            Self::AreaMean => area_mean(grid),
        }
        .map_err(|e| (SkipReason::from_io(&e), e.to_string()))?;
        gwpm_stats::nan_mean(&reduced.to_flat()).ok_or_else(|| {
            (
                SkipReason::NoValidCells,
                "no finite value at the series target".to_string(),
            )
        })
    }
}

/// One issue date of the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub issue: NaiveDate,
    pub target: NaiveDate,
    pub reference: f64,
    /// `None` where the source was skipped.
    pub forecasts: BTreeMap<String, Option<f64>>,
}

/// Temporal agreement of one source with the reference series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesScore {
    pub correlation: Option<f64>,
    pub rmse: Option<f64>,
    /// Dates where both values exist.
    pub n: usize,
}

/// Output of [`point_series`].
#[derive(Debug, Serialize)]
pub struct SeriesReport {
    pub run: RunSummary,
    pub horizon: u32,
    pub target: SeriesTarget,
    pub rows: Vec<SeriesRow>,
    pub scores: BTreeMap<String, SeriesScore>,
    pub skipped: Vec<SkipRecord>,
}

struct SeriesVisitor {
    target: SeriesTarget,
    sources: Vec<String>,
    rows: BTreeMap<NaiveDate, SeriesRow>,
}

impl Visitor for SeriesVisitor {
    type Item = f64;

    fn on_reference(
        &mut self,
        issue: NaiveDate,
        horizon: u32,
        reference: &Grid,
    ) -> Result<(), (SkipReason, String)> {
        let value = self.target.reduce(reference)?;
        let target = target_date(issue, horizon).map_err(|e| (SkipReason::Unreadable, e.to_string()))?;
        self.rows.insert(
            issue,
            SeriesRow {
                issue,
                target,
                reference: value,
                forecasts: self.sources.iter().map(|s| (s.clone(), None)).collect(),
            },
        );
        Ok(())
    }

    fn measure(&self, forecast: &Grid, _reference: &Grid) -> Result<f64, (SkipReason, String)> {
        self.target.reduce(forecast)
    }

    fn record(&mut self, issue: NaiveDate, _horizon: u32, source: &str, item: f64) {
        if let Some(row) = self.rows.get_mut(&issue) {
            row.forecasts.insert(source.to_string(), Some(item));
        }
    }
}

/// Collect the reference and every source's value at `target` for each
/// issue date at one `horizon`, then score each source's series against
/// the reference series.
///
/// Dates whose reference is unusable produce no row. A source's correlation
/// is `None` with fewer than two dates or a constant series.
///
/// # Errors
///
/// Configuration problems as for [`verify`](crate::verify).
pub fn point_series(
    catalog: &Catalog,
    loader: &dyn GridLoader,
    config: &VerifyConfig,
    horizon: u32,
    target: SeriesTarget,
) -> Result<SeriesReport, EvaluateError> {
    let config = config.clone().with_horizons([horizon]).with_area_mean(false);
    let plan = Plan::build(catalog, &config)?;
    let sources: Vec<String> = plan.source_ids().into_iter().map(str::to_string).collect();

    let mut visitor = SeriesVisitor {
        target,
        sources: sources.clone(),
        rows: BTreeMap::new(),
    };
    let skipped = sweep::run(catalog, loader, &config, &plan, &mut visitor)?;
    let rows: Vec<SeriesRow> = visitor.rows.into_values().collect();

    let scores = sources
        .iter()
        .map(|id| {
            let (r, f): (Vec<f64>, Vec<f64>) = rows
                .iter()
                .filter_map(|row| row.forecasts.get(id).copied().flatten().map(|v| (row.reference, v)))
                .unzip();
            let score = SeriesScore {
                correlation: gwpm_stats::pearson_correlation(&f, &r),
                rmse: gwpm_stats::rmse(&f, &r),
                n: gwpm_stats::finite_pairs(&f, &r).len(),
            };
            (id.clone(), score)
        })
        .collect();

    Ok(SeriesReport {
        run: RunSummary::new(catalog, &config, &plan)?,
        horizon,
        target,
        rows,
        scores,
        skipped,
    })
}
