//! Error types for gwpm-catalog.

/// Configuration errors raised while building a catalog or resolving a
/// request. All of them mean the run is misconfigured, so callers fail
/// fast instead of skipping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// A path template could not be parsed or filled.
    #[error("invalid path template '{template}': {reason}")]
    Template {
        /// The template text.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// No source with this identifier exists.
    #[error("unknown source '{id}'")]
    UnknownSource {
        /// Requested source identifier.
        id: String,
    },

    /// No parameter with this identifier exists.
    #[error("unknown parameter '{id}'")]
    UnknownParameter {
        /// Requested parameter identifier.
        id: String,
    },

    /// Two sources or two parameters share an identifier.
    #[error("duplicate {kind} '{id}'")]
    Duplicate {
        /// `"source"` or `"parameter"`.
        kind: &'static str,
        /// The repeated identifier.
        id: String,
    },

    /// The source does not provide the parameter.
    #[error("source '{source_id}' does not provide parameter '{parameter}'")]
    UnsupportedParameter {
        /// Source identifier.
        source_id: String,
        /// Parameter identifier.
        parameter: String,
    },

    /// A predictor has no in-file variable name.
    #[error("source '{source_id}' has no variable name for predictor '{parameter}'")]
    MissingVariableName {
        /// Source identifier.
        source_id: String,
        /// Parameter identifier.
        parameter: String,
    },

    /// The horizon is zero or beyond what the source produces.
    #[error("horizon {horizon} is outside 1..={max} for source '{source_id}'")]
    HorizonOutOfRange {
        /// Source identifier.
        source_id: String,
        /// Requested horizon in days.
        horizon: u32,
        /// Longest lead time the source produces.
        max: u32,
    },

    /// A source is used in a role its kind does not allow.
    #[error("source '{source_id}' is a {actual} source, expected {expected}")]
    WrongKind {
        /// Source identifier.
        source_id: String,
        /// Kind required by the caller.
        expected: &'static str,
        /// Kind the source actually has.
        actual: &'static str,
    },

    /// A member was requested from a source whose template has no
    /// `{ensemble}` slot, so every member would map to the same file.
    #[error("source '{source_id}' has no {{ensemble}} slot in its path template")]
    NoEnsembleSlot {
        /// Source identifier.
        source_id: String,
    },

    /// Target date arithmetic failed.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },
}

impl From<gwpm_calendar::CalendarError> for CatalogError {
    fn from(e: gwpm_calendar::CalendarError) -> Self {
        CatalogError::Calendar {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unsupported_parameter() {
        let err = CatalogError::UnsupportedParameter {
            source_id: "ECMWF_AIFS".to_string(),
            parameter: "RelHum".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "source 'ECMWF_AIFS' does not provide parameter 'RelHum'"
        );
    }

    #[test]
    fn display_horizon_out_of_range() {
        let err = CatalogError::HorizonOutOfRange {
            source_id: "ICON".to_string(),
            horizon: 9,
            max: 7,
        };
        assert_eq!(
            err.to_string(),
            "horizon 9 is outside 1..=7 for source 'ICON'"
        );
    }

    #[test]
    fn display_template() {
        let err = CatalogError::Template {
            template: "{base_path}/{foo}".to_string(),
            reason: "unknown placeholder 'foo'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid path template '{base_path}/{foo}': unknown placeholder 'foo'"
        );
    }

    #[test]
    fn display_no_ensemble_slot() {
        let err = CatalogError::NoEnsembleSlot {
            source_id: "ICON".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "source 'ICON' has no {ensemble} slot in its path template"
        );
    }

    #[test]
    fn from_calendar_error() {
        let cal = gwpm_calendar::CalendarError::InvalidDate {
            input: "x".to_string(),
        };
        let err: CatalogError = cal.into();
        assert!(matches!(err, CatalogError::Calendar { .. }));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<CatalogError>();
    }
}
