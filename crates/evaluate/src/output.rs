//! JSON output structures for verification results.

use chrono::NaiveDate;
use gwpm_catalog::Catalog;
use gwpm_io::Region;
use serde::Serialize;

use crate::accumulate::{Accumulator, Summary, Table};
use crate::config::VerifyConfig;
use crate::error::EvaluateError;
use crate::skip::SkipRecord;
use crate::sweep::Plan;

/// Top-level output of [`verify`](crate::verify).
#[derive(Debug, Serialize)]
pub struct VerifyReport {
    pub run: RunSummary,
    /// horizon → source → average RMSE.
    pub rmse: Table<Summary>,
    /// horizon → source → average correlation.
    pub correlation: Table<Summary>,
    /// Sums and counts behind the averages.
    pub raw: Accumulator,
    pub skipped: Vec<SkipRecord>,
}

/// What a run covered.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub parameter: String,
    pub parameter_name: String,
    pub units: String,
    pub reference: String,
    pub climatology: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub n_issue_dates: usize,
    pub horizons: Vec<u32>,
    /// Scored sources in catalog order.
    pub sources: Vec<String>,
    pub region: Option<RegionSummary>,
    pub area_mean: bool,
}

impl RunSummary {
    pub(crate) fn new(
        catalog: &Catalog,
        config: &VerifyConfig,
        plan: &Plan<'_>,
    ) -> Result<Self, EvaluateError> {
        let parameter = catalog.parameter(plan.parameter)?;
        let n_issue_dates = (config.end() - config.start()).num_days() + 1;
        Ok(Self {
            parameter: parameter.id().to_string(),
            parameter_name: parameter.name().to_string(),
            units: parameter.units().to_string(),
            reference: plan.reference.id().to_string(),
            climatology: plan.climatology.map(|c| c.id().to_string()),
            start: config.start(),
            end: config.end(),
            n_issue_dates: usize::try_from(n_issue_dates).unwrap_or(0),
            horizons: plan.horizons.iter().map(|(h, _)| *h).collect(),
            sources: plan.source_ids().into_iter().map(str::to_string).collect(),
            region: config.region().map(RegionSummary::from),
            area_mean: config.area_mean(),
        })
    }
}

/// Serializable form of a [`Region`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionSummary {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl From<&Region> for RegionSummary {
    fn from(r: &Region) -> Self {
        Self {
            lat_min: r.lat_min(),
            lat_max: r.lat_max(),
            lon_min: r.lon_min(),
            lon_max: r.lon_max(),
        }
    }
}

/// Serialize any report to a pretty-printed JSON string.
pub fn to_json<T: Serialize>(output: &T) -> Result<String, EvaluateError> {
    serde_json::to_string_pretty(output).map_err(|e| EvaluateError::Serialization {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_summary_serializes() {
        let r = Region::new(36.0, 41.0, 67.0, 75.5).unwrap();
        let json = serde_json::to_string(&RegionSummary::from(&r)).unwrap();
        assert_eq!(
            json,
            r#"{"lat_min":36.0,"lat_max":41.0,"lon_min":67.0,"lon_max":75.5}"#
        );
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&Summary {
            mean: None,
            count: 0,
        })
        .unwrap();
        assert!(json.contains("\"mean\": null"));
        assert!(json.contains("\"count\": 0"));
    }
}
