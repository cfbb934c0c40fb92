//! Scan Input Parser
//!
//! Classifies raw barcode/QR scan input into typed results. Input arrives as
//! one line of free text or a structured JSON envelope; classification is a
//! pure function with a strict precedence order and a deliberate best-effort
//! fallback for token shapes the parser does not recognise.

pub mod error;
pub mod parser;
pub mod payload;
pub mod types;

// Public API module - the preferred interface for other modules
pub mod api;

pub use error::{ParseResult, ValidationError};
pub use parser::{is_valid_awb, parse};
pub use payload::{generate_manifest_qr_payload, generate_shipment_qr_payload, ScanEnvelope};
pub use types::{Metadata, ScanResult};
