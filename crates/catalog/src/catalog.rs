//! The validated, read-only table of sources and parameters.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::CatalogError;
use crate::parameter::Parameter;
use crate::source::{Source, SourceKind};

/// All sources and parameters known to a run.
///
/// Built once by [`Catalog::new`], which validates every cross-reference;
/// afterwards it is only read. Sources keep their declaration order, which
/// is the column order of every report.
#[derive(Debug, Clone)]
pub struct Catalog {
    sources: Vec<Source>,
    parameters: Vec<Parameter>,
}

impl Catalog {
    /// Validates and assembles a catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Duplicate`] for a repeated source or parameter id.
    /// - Any error from [`Source::validate`].
    /// - [`CatalogError::UnknownSource`] if a parameter names a missing
    ///   reference, [`CatalogError::WrongKind`] if it names a non-reference,
    ///   [`CatalogError::UnsupportedParameter`] if the reference lacks it.
    pub fn new(sources: Vec<Source>, parameters: Vec<Parameter>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for s in &sources {
            if !seen.insert(s.id()) {
                return Err(CatalogError::Duplicate {
                    kind: "source",
                    id: s.id().to_string(),
                });
            }
            s.validate()?;
        }

        let mut seen = BTreeSet::new();
        for p in &parameters {
            if !seen.insert(p.id()) {
                return Err(CatalogError::Duplicate {
                    kind: "parameter",
                    id: p.id().to_string(),
                });
            }
        }

        let catalog = Self {
            sources,
            parameters,
        };
        for p in &catalog.parameters {
            catalog.check_reference(p.id(), p.reference())?;
        }

        debug!(
            n_sources = catalog.sources.len(),
            n_parameters = catalog.parameters.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    /// Checks that `reference` is a reference source providing `parameter`.
    ///
    /// # Errors
    ///
    /// See [`Catalog::new`].
    pub fn check_reference(&self, parameter: &str, reference: &str) -> Result<(), CatalogError> {
        let source = self.source(reference)?;
        if source.kind() != &SourceKind::Reference {
            return Err(CatalogError::WrongKind {
                source_id: reference.to_string(),
                expected: "reference",
                actual: source.kind().label(),
            });
        }
        source.variable_name(parameter)?;
        Ok(())
    }

    /// Looks up a source by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSource`] if absent.
    pub fn source(&self, id: &str) -> Result<&Source, CatalogError> {
        self.sources
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| CatalogError::UnknownSource { id: id.to_string() })
    }

    /// Looks up a parameter by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownParameter`] if absent.
    pub fn parameter(&self, id: &str) -> Result<&Parameter, CatalogError> {
        self.parameters
            .iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| CatalogError::UnknownParameter { id: id.to_string() })
    }

    /// All sources in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.sources.iter()
    }

    /// All parameters in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    /// Forecast sources that provide `parameter`, in declaration order.
    pub fn forecast_sources<'a>(&'a self, parameter: &'a str) -> impl Iterator<Item = &'a Source> {
        self.sources
            .iter()
            .filter(move |s| matches!(s.kind(), SourceKind::Forecast { .. }) && s.supports(parameter))
    }

    /// The parameter's configured reference source.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownParameter`] if the parameter is absent.
    pub fn reference_for(&self, parameter: &str) -> Result<&Source, CatalogError> {
        let p = self.parameter(parameter)?;
        self.source(p.reference())
    }

    /// Forecast sources that provide `parameter` and reach `horizon`.
    pub fn eligible_sources<'a>(&'a self, parameter: &'a str, horizon: u32) -> Vec<&'a Source> {
        self.forecast_sources(parameter)
            .filter(|s| s.max_horizon().is_some_and(|max| horizon >= 1 && horizon <= max))
            .collect()
    }
}
