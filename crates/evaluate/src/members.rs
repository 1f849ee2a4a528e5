//! Ensemble member trajectories for one issue date.
//!
//! Each member of one forecast source is read at every horizon and reduced
//! to a single value at a point or area, so the spread of the ensemble can
//! be followed along the lead time. No reference is involved.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use gwpm_calendar::target_date;
use gwpm_catalog::{Catalog, CatalogError, ForecastRequest, SourceKind, resolve_member};
use gwpm_io::{GridLoader, Region};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::EvaluateError;
use crate::series::SeriesTarget;
use crate::skip::{SkipReason, SkipRecord, SkipRole};

/// Which members of which source to read, for one issue cycle.
#[derive(Debug, Clone)]
pub struct MemberConfig {
    source: String,
    parameter: String,
    issue: NaiveDate,
    members: Vec<String>,
    horizons: Option<Vec<u32>>,
    region: Option<Region>,
}

impl MemberConfig {
    /// Every horizon the source produces, for the given members.
    pub fn new<I, S>(
        source: impl Into<String>,
        parameter: impl Into<String>,
        issue: NaiveDate,
        members: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into(),
            parameter: parameter.into(),
            issue,
            members: members.into_iter().map(Into::into).collect(),
            horizons: None,
            region: None,
        }
    }

    /// Only read these lead times.
    pub fn with_horizons(mut self, horizons: impl IntoIterator<Item = u32>) -> Self {
        self.horizons = Some(horizons.into_iter().collect());
        self
    }

    /// Cut each grid to `region` before reducing it.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn issue(&self) -> NaiveDate {
        self.issue
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.members.is_empty() {
            problems.push("no ensemble members given".to_string());
        }
        let unique: BTreeSet<&String> = self.members.iter().collect();
        if unique.len() != self.members.len() {
            problems.push("ensemble members repeat".to_string());
        }
        if let Some(h) = &self.horizons {
            if h.is_empty() {
                problems.push("no horizons given".to_string());
            }
            let unique: BTreeSet<&u32> = h.iter().collect();
            if unique.len() != h.len() {
                problems.push("horizons repeat".to_string());
            }
        }
        problems
    }
}

/// All members at one lead time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRow {
    pub horizon: u32,
    pub target: NaiveDate,
    /// `None` where the member was skipped.
    pub values: BTreeMap<String, Option<f64>>,
    /// Ensemble mean over the members that have a value.
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Output of [`member_series`].
#[derive(Debug, Serialize)]
pub struct MemberReport {
    pub source: String,
    pub parameter: String,
    pub issue: NaiveDate,
    pub target: SeriesTarget,
    pub members: Vec<String>,
    pub rows: Vec<MemberRow>,
    pub skipped: Vec<SkipRecord>,
}

/// Read every member of `config.source` at every horizon and reduce each
/// grid to one value at `target`.
///
/// Missing or unreadable member files become `None` plus a skip record.
///
/// # Errors
///
/// - [`EvaluateError::Validation`] for an empty or repeating member or
///   horizon list.
/// - [`EvaluateError::Catalog`] for a non-forecast source, a template
///   without an `{ensemble}` slot, or a horizon beyond the source's range.
pub fn member_series(
    catalog: &Catalog,
    loader: &dyn GridLoader,
    config: &MemberConfig,
    target: SeriesTarget,
) -> Result<MemberReport, EvaluateError> {
    let problems = config.problems();
    if !problems.is_empty() {
        return Err(EvaluateError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        });
    }

    let source = catalog.source(&config.source)?;
    let SourceKind::Forecast { max_horizon, .. } = source.kind() else {
        return Err(CatalogError::WrongKind {
            source_id: source.id().to_string(),
            expected: "forecast",
            actual: source.kind().label(),
        }
        .into());
    };
    let horizons = match &config.horizons {
        Some(h) => h.clone(),
        None => (1..=*max_horizon).collect(),
    };

    // Resolve everything first so configuration errors surface before I/O.
    let mut requests = Vec::with_capacity(horizons.len());
    for &h in &horizons {
        let request = ForecastRequest::new(&config.source, &config.parameter, config.issue, h);
        let paths = config
            .members
            .iter()
            .map(|m| resolve_member(catalog, &request, m))
            .collect::<Result<Vec<_>, _>>()?;
        requests.push((h, paths));
    }

    let mut rows = Vec::with_capacity(requests.len());
    let mut skipped = Vec::new();
    for (horizon, paths) in requests {
        let outcomes: Vec<_> = paths
            .par_iter()
            .map(|resolved| {
                loader
                    .load(&resolved.path, &resolved.variable)
                    .and_then(|grid| match &config.region {
                        Some(region) => region.subset(&grid),
                        None => Ok(grid),
                    })
                    .map_err(|e| (SkipReason::from_io(&e), e.to_string()))
                    .and_then(|grid| target.reduce(&grid))
            })
            .collect();

        let mut values = BTreeMap::new();
        for ((member, resolved), outcome) in config.members.iter().zip(&paths).zip(outcomes) {
            match outcome {
                Ok(v) => {
                    values.insert(member.clone(), Some(v));
                }
                Err((reason, detail)) => {
                    skipped.push(
                        SkipRecord::new(
                            config.issue,
                            horizon,
                            SkipRole::Forecast,
                            Some(config.source.as_str()),
                            reason,
                            &resolved.path,
                            format!("member {member}: {detail}"),
                        )
                        .with_member(member),
                    );
                    values.insert(member.clone(), None);
                }
            }
        }

        let present: Vec<f64> = values.values().flatten().copied().collect();
        rows.push(MemberRow {
            horizon,
            target: target_date(config.issue, horizon)?,
            mean: gwpm_stats::nan_mean(&present),
            min: present.iter().copied().reduce(f64::min),
            max: present.iter().copied().reduce(f64::max),
            values,
        });
    }

    info!(
        source = config.source.as_str(),
        n_members = config.members.len(),
        n_horizons = rows.len(),
        n_skipped = skipped.len(),
        "member trajectories collected"
    );

    Ok(MemberReport {
        source: config.source.clone(),
        parameter: config.parameter.clone(),
        issue: config.issue,
        target,
        members: config.members.clone(),
        rows,
        skipped,
    })
}
