//! Generic error handling utilities
//!
//! Provides unified error handling that can work across different error types
//! while maintaining domain-specific error logging patterns.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// This trait enables generic error handling functions to determine whether an
/// error should show specific operator messages or generic context with debug
/// details.
///
/// # Design Principles
/// - Operator-actionable errors (a mistyped manifest code, a malformed scan
///   payload) should show specific messages
/// - System errors (record-store failures, channel breakage) should show
///   generic context to avoid overwhelming operators mid-scan
/// - All errors should provide debug details for administrators
///
/// # Implementation Consistency
/// When `is_user_actionable()` returns `true`, `user_message()` may return
/// `Some(message)` with a canned, actionable message; if it returns `None`,
/// the error's `Display` output is treated as the operator-facing message.
/// When `is_user_actionable()` returns `false`, `user_message()` should
/// return `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if this error contains a specific, user-actionable message
    /// that should be displayed directly to the operator
    ///
    /// Examples of user-actionable errors:
    /// - Scan input validation failures
    /// - Manifest codes that resolve to nothing
    /// - Tracking codes absent from the active manifest
    ///
    /// Examples of system errors:
    /// - Record-store persistence failures
    /// - Event delivery failures
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    ///
    /// This should return Some(message) when is_user_actionable() returns
    /// true, and None otherwise.
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// - Operator-actionable errors log their specific message (preserves detail)
/// - System errors log the generic operation context, with the full error
///   pushed down to debug level
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    if error.is_user_actionable() {
        if let Some(user_msg) = error.user_message() {
            log::error!("{}", user_msg);
        } else {
            log::error!("{}", error);
        }
    } else {
        log::error!("{} failed", operation_context);
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
