//! Evaluation error types.

use gwpm_calendar::CalendarError;
use gwpm_catalog::CatalogError;
use gwpm_io::IoError;

/// Errors that stop a verification run.
///
/// Per-item data problems never surface here; they become
/// [`SkipRecord`](crate::SkipRecord)s instead.
#[derive(Debug, thiserror::Error)]
pub enum EvaluateError {
    /// One or more validation checks failed.
    #[error("{count} validation error(s): {details}")]
    Validation { count: usize, details: String },

    /// The catalog rejected a lookup or request.
    #[error("catalog error: {reason}")]
    Catalog { reason: String },

    /// Date arithmetic failed.
    #[error("calendar error: {reason}")]
    Calendar { reason: String },

    /// Writing or reshaping output grids failed.
    #[error("io error: {reason}")]
    Io { reason: String },

    /// No forecast source can be scored at this horizon.
    #[error("no forecast source provides '{parameter}' at horizon {horizon}")]
    NoEligibleSource { parameter: String, horizon: u32 },

    /// The sweep finished without any usable data.
    #[error("no data: {reason}")]
    NoData { reason: String },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<CatalogError> for EvaluateError {
    fn from(e: CatalogError) -> Self {
        EvaluateError::Catalog {
            reason: e.to_string(),
        }
    }
}

impl From<CalendarError> for EvaluateError {
    fn from(e: CalendarError) -> Self {
        EvaluateError::Calendar {
            reason: e.to_string(),
        }
    }
}

impl From<IoError> for EvaluateError {
    fn from(e: IoError) -> Self {
        EvaluateError::Io {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = EvaluateError::Validation {
            count: 2,
            details: "empty horizons; start after end".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("2 validation error(s)"));
        assert!(msg.contains("start after end"));
    }

    #[test]
    fn test_no_eligible_source_display() {
        let err = EvaluateError::NoEligibleSource {
            parameter: "Temp".to_string(),
            horizon: 16,
        };
        assert_eq!(
            err.to_string(),
            "no forecast source provides 'Temp' at horizon 16"
        );
    }

    #[test]
    fn test_from_catalog_error() {
        let err: EvaluateError = CatalogError::UnknownSource {
            id: "GFS".to_string(),
        }
        .into();
        assert!(matches!(err, EvaluateError::Catalog { .. }));
        assert!(err.to_string().contains("unknown source 'GFS'"));
    }

    #[test]
    fn test_serialization_display() {
        let err = EvaluateError::Serialization {
            reason: "invalid JSON".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("serialization error"));
        assert!(msg.contains("invalid JSON"));
    }
}
