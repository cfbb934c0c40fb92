//! Scan API
//!
//! This module provides the public API for the scan classification system,
//! consolidating all external exports and providing a controlled interface
//! for accessing parser functionality.
//!
//! This follows the same pattern as the audit::api and store::api modules to
//! maintain consistent architecture across the application.

// Classification entry points
pub use crate::scan::parser::{is_valid_awb, parse};

// Outbound label/QR payload generation
pub use crate::scan::payload::{
    generate_manifest_qr_payload, generate_shipment_qr_payload, ScanEnvelope, ENVELOPE_VERSION,
};

// Error handling
pub use crate::scan::error::{ParseResult, ValidationError};

// Core data types
pub use crate::scan::types::{Metadata, ScanResult};
