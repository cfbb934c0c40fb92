//! Record Store Error Types

/// Generic error shape of the hosted record store: a status code plus a
/// human-readable message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Record store error {code}: {message}")]
pub struct StoreError {
    pub code: u16,
    pub message: String,
}

impl StoreError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Missing record on an update path
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message)
    }

    /// Backend temporarily unreachable
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(503, message)
    }
}

impl crate::core::error_handling::ContextualError for StoreError {
    fn is_user_actionable(&self) -> bool {
        false // Persistence failures are system-level
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Result type for record-store operations
pub type StoreResult<T> = Result<T, StoreError>;
