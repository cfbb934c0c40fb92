//! Structured QR envelope payloads
//!
//! The JSON envelope printed into outbound labels and QR codes, plus the
//! generators that construct it. `parser::parse` is the inverse: payloads
//! built here round-trip through classification.

use serde::{Deserialize, Serialize};

use crate::scan::error::{ParseResult, ValidationError};
use crate::scan::parser::is_valid_awb;
use crate::scan::types::Metadata;

/// Envelope version this build understands
pub const ENVELOPE_VERSION: u64 = 1;

/// Wire model of the structured scan payload
///
/// `type` is the entity discriminator (`manifest`, `package`, or absent for
/// shipment); identifier fields are camelCase to match the label printers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEnvelope {
    pub v: u64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub meta: Metadata,
}

/// Build the QR payload for one shipment label
///
/// The tracking code is validated strictly; generators never emit payloads
/// the parser would reject.
pub fn generate_shipment_qr_payload(code: &str) -> ParseResult<String> {
    if !is_valid_awb(code) {
        return Err(ValidationError::InvalidTrackingCode {
            code: code.to_string(),
        });
    }

    let envelope = ScanEnvelope {
        v: ENVELOPE_VERSION,
        awb: Some(code.trim().to_uppercase()),
        ..Default::default()
    };
    serialize_envelope(&envelope)
}

/// Build the QR payload for a manifest cover sheet
pub fn generate_manifest_qr_payload(
    manifest_id: &str,
    manifest_no: &str,
    route: Option<&str>,
) -> ParseResult<String> {
    let envelope = ScanEnvelope {
        v: ENVELOPE_VERSION,
        entity_type: Some("manifest".to_string()),
        id: Some(manifest_id.to_string()),
        manifest_no: Some(manifest_no.trim().to_uppercase()),
        route: route.map(|r| r.to_string()),
        ..Default::default()
    };
    serialize_envelope(&envelope)
}

fn serialize_envelope(envelope: &ScanEnvelope) -> ParseResult<String> {
    serde_json::to_string(envelope).map_err(|e| ValidationError::MalformedEnvelope {
        message: e.to_string(),
    })
}
