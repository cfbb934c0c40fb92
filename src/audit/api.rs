//! Audit API
//!
//! This module provides the public API for the arrival audit system,
//! consolidating all external exports and providing a controlled interface
//! for accessing engine functionality.

// The session coordinator
pub use crate::audit::engine::ArrivalAuditEngine;

// Session types
pub use crate::audit::types::{AuditStats, LineStatus, ManifestLine, OrgContext, ScanOutcome};

// Feedback signal sink
pub use crate::audit::feedback::{CountingFeedback, FeedbackSink, NullFeedback};

// Error handling
pub use crate::audit::error::{AuditError, AuditResult};
