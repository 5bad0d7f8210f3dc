use std::fmt;

use crate::validation::ValidationReport;

/// Import failure tiers.
#[derive(Debug)]
pub enum ImportError {
    /// Pre-flight validation failed; the whole import was cancelled before
    /// any document mutation.
    Validation(ValidationReport),

    /// Invariant violation during synthesis; the run aborted mid-mutation
    /// and the document may be partially modified. No rollback.
    Fatal(anyhow::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Validation(report) => write!(
                f,
                "import cancelled: {} validation error(s)",
                report.error_count
            ),
            ImportError::Fatal(e) => write!(f, "import failed: {}", e),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Fatal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ImportError {
    fn from(err: anyhow::Error) -> Self {
        ImportError::Fatal(err)
    }
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
