//! Turning a forecast request into an archive path.

use std::path::PathBuf;

use chrono::NaiveDate;
use gwpm_calendar::{DoyCode, run_stamp, target_date};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::source::{Source, SourceKind};
use crate::template::{Placeholder, TemplateValues};

/// One (source, parameter, issue date, horizon) combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub source: String,
    pub parameter: String,
    pub issue: NaiveDate,
    /// Days ahead of `issue`.
    pub horizon: u32,
}

impl ForecastRequest {
    pub fn new(
        source: impl Into<String>,
        parameter: impl Into<String>,
        issue: NaiveDate,
        horizon: u32,
    ) -> Self {
        Self {
            source: source.into(),
            parameter: parameter.into(),
            issue,
            horizon,
        }
    }
}

/// Where a grid should be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Full file path.
    pub path: PathBuf,
    /// Variable to read from the file.
    pub variable: String,
    /// Date the grid describes.
    pub target: NaiveDate,
    /// Day-of-year code of `target`.
    pub code: DoyCode,
}

/// Resolves a request against the catalog.
///
/// Forecast sources fill `{date_time}` from the issue date and run hour and
/// `{ensemble}` from their fixed member. Reference and climatology sources
/// skip the issue-date step and are keyed by the target day only.
///
/// # Errors
///
/// - [`CatalogError::UnknownSource`] / [`CatalogError::UnknownParameter`].
/// - [`CatalogError::UnsupportedParameter`] if the source does not list the
///   parameter.
/// - [`CatalogError::HorizonOutOfRange`] for a forecast horizon of zero or
///   beyond the source's maximum lead time.
pub fn resolve(catalog: &Catalog, request: &ForecastRequest) -> Result<ResolvedPath, CatalogError> {
    resolve_with(catalog, request, None)
}

/// Resolves a forecast request for one named ensemble `member` instead of
/// the source's representative member.
///
/// # Errors
///
/// As [`resolve`], plus [`CatalogError::WrongKind`] for a non-forecast
/// source and [`CatalogError::NoEnsembleSlot`] if the source's template
/// cannot tell members apart.
pub fn resolve_member(
    catalog: &Catalog,
    request: &ForecastRequest,
    member: &str,
) -> Result<ResolvedPath, CatalogError> {
    let source = catalog.source(&request.source)?;
    if !matches!(source.kind(), SourceKind::Forecast { .. }) {
        return Err(CatalogError::WrongKind {
            source_id: source.id().to_string(),
            expected: "forecast",
            actual: source.kind().label(),
        });
    }
    if !source.template().uses(Placeholder::Ensemble) {
        return Err(CatalogError::NoEnsembleSlot {
            source_id: source.id().to_string(),
        });
    }
    resolve_with(catalog, request, Some(member))
}

fn resolve_with(
    catalog: &Catalog,
    request: &ForecastRequest,
    member: Option<&str>,
) -> Result<ResolvedPath, CatalogError> {
    catalog.parameter(&request.parameter)?;
    let source = catalog.source(&request.source)?;

    match source.kind() {
        SourceKind::Forecast {
            ensemble,
            run_hour,
            max_horizon,
        } => {
            if request.horizon == 0 || request.horizon > *max_horizon {
                return Err(CatalogError::HorizonOutOfRange {
                    source_id: source.id().to_string(),
                    horizon: request.horizon,
                    max: *max_horizon,
                });
            }
            let target = target_date(request.issue, request.horizon)?;
            fill(
                source,
                &request.parameter,
                target,
                Some(run_stamp(request.issue, *run_hour)),
                member.or(ensemble.as_deref()),
            )
        }
        SourceKind::Reference | SourceKind::Climatology => {
            let target = target_date(request.issue, request.horizon)?;
            fill(source, &request.parameter, target, None, None)
        }
    }
}

/// Resolves the grid a reference or climatology source holds for `target`.
///
/// # Errors
///
/// [`CatalogError::WrongKind`] for a forecast source, otherwise as
/// [`resolve`].
pub fn resolve_target(
    source: &Source,
    parameter: &str,
    target: NaiveDate,
) -> Result<ResolvedPath, CatalogError> {
    if let SourceKind::Forecast { .. } = source.kind() {
        return Err(CatalogError::WrongKind {
            source_id: source.id().to_string(),
            expected: "reference or climatology",
            actual: source.kind().label(),
        });
    }
    fill(source, parameter, target, None, None)
}

fn fill(
    source: &Source,
    parameter: &str,
    target: NaiveDate,
    date_time: Option<String>,
    ensemble: Option<&str>,
) -> Result<ResolvedPath, CatalogError> {
    let variable = source.variable_name(parameter)?.to_string();
    let code = DoyCode::from_date(target);
    let values = TemplateValues {
        base_path: Some(source.data_path()),
        parameter: Some(parameter),
        date_time,
        ensemble,
        file_name: Some(code.to_string()),
        doy: Some(code.ordinal_str()),
    };
    let path = source.template().fill(&values)?;
    Ok(ResolvedPath {
        path,
        variable,
        target,
        code,
    })
}
