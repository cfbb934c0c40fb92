//! Scan Input Error Types

use std::fmt;

/// Validation failures for structured scan input
///
/// Free-text tokens never produce these; unrecognised shapes fall through to
/// the shipment fallback instead. Only empty input and internally
/// inconsistent JSON envelopes are rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Input was empty after trimming
    EmptyInput,
    /// Input looked like a JSON envelope but did not parse as one
    MalformedEnvelope { message: String },
    /// Envelope carried a version other than the supported one
    UnsupportedVersion { found: u64 },
    /// Envelope declared an entity type but lacked its required identifier
    MissingIdentifier {
        entity: &'static str,
        field: &'static str,
    },
    /// Envelope carried a tracking code that matches no recognised shape
    InvalidTrackingCode { code: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyInput => write!(f, "Scan input is empty"),
            ValidationError::MalformedEnvelope { message } => {
                write!(f, "Malformed scan envelope: {}", message)
            }
            ValidationError::UnsupportedVersion { found } => {
                write!(f, "Unsupported scan envelope version: {}", found)
            }
            ValidationError::MissingIdentifier { entity, field } => {
                write!(f, "Scan envelope for {} is missing {}", entity, field)
            }
            ValidationError::InvalidTrackingCode { code } => {
                write!(f, "Invalid tracking code in scan envelope: {}", code)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        // All parser rejections describe the operator's input
        true
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ValidationError::EmptyInput => Some("Scan input is empty"),
            _ => None,
        }
    }
}

pub type ParseResult<T> = Result<T, ValidationError>;
