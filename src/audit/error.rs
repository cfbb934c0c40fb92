//! Audit Engine Error Types

use crate::scan::error::ValidationError;
use crate::store::error::StoreError;

/// Errors surfaced by the arrival audit engine
///
/// Everything except `Store` describes something the operator can act on by
/// rescanning or picking a different manifest; `Store` carries a persistence
/// failure after the store layer's own retries are exhausted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuditError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No manifest matches '{code}'")]
    ManifestNotFound { code: String },

    #[error("'{awb}' is not on manifest {manifest_no}")]
    NotOnManifest { awb: String, manifest_no: String },

    #[error("No audit session is active")]
    NoActiveSession,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl crate::core::error_handling::ContextualError for AuditError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, AuditError::Store(_))
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AuditError::NoActiveSession => {
                Some("Scan or enter a manifest code to start an audit session")
            }
            _ => None,
        }
    }
}

/// Result type for audit engine operations
pub type AuditResult<T> = Result<T, AuditError>;
