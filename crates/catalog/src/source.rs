//! Forecast, reference, and climatology source definitions.

use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::template::{PathTemplate, Placeholder};

/// What role a source plays, with the fields only that role carries.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    /// A forecast model archive keyed by issue cycle and target day.
    Forecast {
        /// Representative ensemble member substituted for `{ensemble}`.
        ensemble: Option<String>,
        /// Cycle hour used in `{date_time}`.
        run_hour: u8,
        /// Longest lead time, in days, the model produces.
        max_horizon: u32,
    },
    /// An observation or reanalysis archive keyed by target day only.
    Reference,
    /// A day-of-year climatological mean keyed by ordinal day.
    Climatology,
}

impl SourceKind {
    /// Short label for messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Forecast { .. } => "forecast",
            Self::Reference => "reference",
            Self::Climatology => "climatology",
        }
    }
}

/// One archive of NetCDF grids.
///
/// Use [`Source::forecast`], [`Source::reference`] or
/// [`Source::climatology`] and the `with_*` builders.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    id: String,
    kind: SourceKind,
    data_path: String,
    template: PathTemplate,
    predictors: Vec<String>,
    variable_names: BTreeMap<String, String>,
}

impl Source {
    fn new(
        id: impl Into<String>,
        kind: SourceKind,
        data_path: impl Into<String>,
        template: &str,
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            id: id.into(),
            kind,
            data_path: data_path.into(),
            template: PathTemplate::parse(template)?,
            predictors: Vec::new(),
            variable_names: BTreeMap::new(),
        })
    }

    /// A forecast model source. Defaults: no ensemble member, run hour 0,
    /// maximum horizon 15 days.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Template`] if `template` does not parse.
    pub fn forecast(
        id: impl Into<String>,
        data_path: impl Into<String>,
        template: &str,
    ) -> Result<Self, CatalogError> {
        Self::new(
            id,
            SourceKind::Forecast {
                ensemble: None,
                run_hour: 0,
                max_horizon: 15,
            },
            data_path,
            template,
        )
    }

    /// A reference (ground-truth) source.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Template`] if `template` does not parse.
    pub fn reference(
        id: impl Into<String>,
        data_path: impl Into<String>,
        template: &str,
    ) -> Result<Self, CatalogError> {
        Self::new(id, SourceKind::Reference, data_path, template)
    }

    /// A day-of-year climatology source.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Template`] if `template` does not parse.
    pub fn climatology(
        id: impl Into<String>,
        data_path: impl Into<String>,
        template: &str,
    ) -> Result<Self, CatalogError> {
        Self::new(id, SourceKind::Climatology, data_path, template)
    }

    /// Set the representative ensemble member (forecast sources only).
    pub fn with_ensemble(mut self, member: impl Into<String>) -> Self {
        if let SourceKind::Forecast { ensemble, .. } = &mut self.kind {
            *ensemble = Some(member.into());
        }
        self
    }

    /// Set the cycle hour (forecast sources only).
    pub fn with_run_hour(mut self, hour: u8) -> Self {
        if let SourceKind::Forecast { run_hour, .. } = &mut self.kind {
            *run_hour = hour;
        }
        self
    }

    /// Set the longest lead time (forecast sources only).
    pub fn with_max_horizon(mut self, horizon: u32) -> Self {
        if let SourceKind::Forecast { max_horizon, .. } = &mut self.kind {
            *max_horizon = horizon;
        }
        self
    }

    /// Declare a supported parameter and its in-file variable name.
    pub fn with_variable(mut self, parameter: impl Into<String>, variable: impl Into<String>) -> Self {
        let parameter = parameter.into();
        if !self.predictors.contains(&parameter) {
            self.predictors.push(parameter.clone());
        }
        self.variable_names.insert(parameter, variable.into());
        self
    }

    /// Restrict the supported parameters to `predictors`. Each one still
    /// needs a variable name, checked by [`Source::validate`].
    pub fn with_predictors<I, S>(mut self, predictors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predictors = predictors.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &SourceKind {
        &self.kind
    }

    /// Directory substituted for `{base_path}`.
    pub fn data_path(&self) -> &str {
        &self.data_path
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Parameters this source provides, in declaration order.
    pub fn predictors(&self) -> &[String] {
        &self.predictors
    }

    /// Whether the source provides `parameter`.
    pub fn supports(&self, parameter: &str) -> bool {
        self.predictors.iter().any(|p| p == parameter)
    }

    /// Longest lead time for forecast sources; `None` otherwise.
    pub fn max_horizon(&self) -> Option<u32> {
        match self.kind {
            SourceKind::Forecast { max_horizon, .. } => Some(max_horizon),
            _ => None,
        }
    }

    /// In-file variable name for `parameter`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedParameter`] if the parameter is not
    /// a predictor of this source.
    pub fn variable_name(&self, parameter: &str) -> Result<&str, CatalogError> {
        if !self.supports(parameter) {
            return Err(CatalogError::UnsupportedParameter {
                source_id: self.id.clone(),
                parameter: parameter.to_string(),
            });
        }
        self.variable_names
            .get(parameter)
            .map(String::as_str)
            .ok_or_else(|| CatalogError::MissingVariableName {
                source_id: self.id.clone(),
                parameter: parameter.to_string(),
            })
    }

    /// Checks the source's template and tables against its kind.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::MissingVariableName`] for a predictor without a
    ///   variable name.
    /// - [`CatalogError::Template`] if the template uses a slot the kind
    ///   cannot fill (`{date_time}` or `{ensemble}` outside forecasts,
    ///   `{ensemble}` without a member).
    pub fn validate(&self) -> Result<(), CatalogError> {
        for p in &self.predictors {
            if !self.variable_names.contains_key(p) {
                return Err(CatalogError::MissingVariableName {
                    source_id: self.id.clone(),
                    parameter: p.clone(),
                });
            }
        }

        let unfillable = |slot: Placeholder, why: &str| CatalogError::Template {
            template: self.template.as_str().to_string(),
            reason: format!("{slot} cannot be used by source '{}': {why}", self.id),
        };

        match &self.kind {
            SourceKind::Forecast {
                ensemble,
                max_horizon,
                ..
            } => {
                if ensemble.is_none() && self.template.uses(Placeholder::Ensemble) {
                    return Err(unfillable(Placeholder::Ensemble, "no ensemble member set"));
                }
                if *max_horizon == 0 {
                    return Err(CatalogError::HorizonOutOfRange {
                        source_id: self.id.clone(),
                        horizon: 0,
                        max: 0,
                    });
                }
            }
            SourceKind::Reference | SourceKind::Climatology => {
                for slot in [Placeholder::DateTime, Placeholder::Ensemble] {
                    if self.template.uses(slot) {
                        return Err(unfillable(slot, "only forecast sources have an issue cycle"));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORECAST: &str = "{base_path}/{parameter}/{date_time}/{ensemble}/Daily/{file_name}.nc";
    const REFERENCE: &str = "{base_path}/{parameter}/Daily/{file_name}.nc";

    #[test]
    fn forecast_defaults() {
        let s = Source::forecast("GEFS", "/d", FORECAST).unwrap();
        assert_eq!(
            s.kind(),
            &SourceKind::Forecast {
                ensemble: None,
                run_hour: 0,
                max_horizon: 15
            }
        );
        assert_eq!(s.max_horizon(), Some(15));
    }

    #[test]
    fn with_variable_adds_predictor_once() {
        let s = Source::reference("ERA5", "/d", REFERENCE)
            .unwrap()
            .with_variable("Temp", "air_temperature")
            .with_variable("Temp", "t2m");
        assert_eq!(s.predictors(), &["Temp".to_string()]);
        assert_eq!(s.variable_name("Temp").unwrap(), "t2m");
    }

    #[test]
    fn variable_name_unsupported() {
        let s = Source::reference("MSWEP", "/d", "{base_path}/NRT/Daily/{file_name}.nc")
            .unwrap()
            .with_variable("P", "precipitation");
        assert!(matches!(
            s.variable_name("Temp"),
            Err(CatalogError::UnsupportedParameter { .. })
        ));
    }

    #[test]
    fn predictor_without_variable_name_fails_validation() {
        let s = Source::forecast("ICON", "/d", REFERENCE)
            .unwrap()
            .with_variable("Temp", "air_temperature")
            .with_predictors(["Temp", "Wind"]);
        assert!(matches!(
            s.validate(),
            Err(CatalogError::MissingVariableName { .. })
        ));
    }

    #[test]
    fn ensemble_slot_requires_member() {
        let s = Source::forecast("GEFS", "/d", FORECAST).unwrap();
        assert!(s.validate().is_err());
        assert!(s.with_ensemble("01").validate().is_ok());
    }

    #[test]
    fn reference_cannot_use_issue_slots() {
        let s = Source::reference("GDAS", "/d", "{base_path}/{date_time}/{file_name}.nc").unwrap();
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("{date_time}"));
    }

    #[test]
    fn builders_ignored_for_reference() {
        let s = Source::reference("ERA5", "/d", REFERENCE)
            .unwrap()
            .with_ensemble("01")
            .with_max_horizon(3);
        assert_eq!(s.kind(), &SourceKind::Reference);
        assert_eq!(s.max_horizon(), None);
    }
}
