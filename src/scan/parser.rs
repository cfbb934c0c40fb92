//! Scan input classification
//!
//! Deterministically classifies one line of raw scan input into a typed
//! [`ScanResult`], or fails with a [`ValidationError`]. Classification is
//! attempted in strict precedence order against the trimmed input; the first
//! match wins:
//!
//! 1. Raw tracking-code token (`TAC`/`TCS` prefix + 8-11 digits)
//! 2. Hyphenated tracking-code token (`CN`/`CON`-YYYY-NNNN)
//! 3. Structured JSON envelope (version 1, `type` discriminator)
//! 4. Legacy fixed-width manifest code (`MAN`-YYYY-NNNNN)
//! 5. Current manifest code (`MNF`/`MFT`-YYYY-NNNNNN)
//! 6. Shipment fallback: anything else is passed through uppercased
//!
//! Step 6 is a deliberate design choice, not an accident: a scanner or
//! operator may produce a token whose format we don't yet recognise (new
//! carrier prefix, OCR noise) and the workflow should attempt a record-store
//! lookup rather than block. Only empty input and internally inconsistent
//! envelopes are hard failures.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::scan::error::{ParseResult, ValidationError};
use crate::scan::payload::{ScanEnvelope, ENVELOPE_VERSION};
use crate::scan::types::{Metadata, ScanResult};

// Current carrier prefix plus the legacy alias still in circulation on older
// labels. 8-11 digits covers every series issued so far.
static RAW_TRACKING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(?:TAC|TCS)\d{8,11}$").expect("valid raw tracking regex"));

static HYPHENATED_TRACKING_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(?:CN|CON)-\d{4}-\d{4}$").expect("valid hyphenated tracking regex")
});

static LEGACY_MANIFEST_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)MAN-\d{4}-\d{5}$").expect("valid legacy manifest regex"));

static MANIFEST_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(?:MNF|MFT)-\d{4}-\d{6}$").expect("valid manifest regex"));

/// Strict tracking-code predicate
///
/// True iff the code matches either recognised tracking-code shape. Used by
/// the payload generators and by callers that need validation without the
/// lookup fallback.
pub fn is_valid_awb(code: &str) -> bool {
    let trimmed = code.trim();
    RAW_TRACKING_CODE.is_match(trimmed) || HYPHENATED_TRACKING_CODE.is_match(trimmed)
}

/// Classify one line of raw scan input
///
/// Pure function: no I/O, no state. See the module docs for the precedence
/// order and the fallback contract.
pub fn parse(input: &str) -> ParseResult<ScanResult> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    // Steps 1-2: bare tracking-code tokens
    if RAW_TRACKING_CODE.is_match(trimmed) || HYPHENATED_TRACKING_CODE.is_match(trimmed) {
        return Ok(ScanResult::Shipment {
            awb: trimmed.to_uppercase(),
            metadata: Metadata::new(),
            raw: input.to_string(),
        });
    }

    // Step 3: structured JSON envelope
    if trimmed.starts_with('{') {
        return parse_envelope(trimmed, input);
    }

    // Steps 4-5: manifest codes, legacy shape first
    if LEGACY_MANIFEST_CODE.is_match(trimmed) || MANIFEST_CODE.is_match(trimmed) {
        return Ok(ScanResult::Manifest {
            manifest_id: None,
            manifest_no: Some(trimmed.to_uppercase()),
            route: None,
            metadata: Metadata::new(),
            raw: input.to_string(),
        });
    }

    // Step 6: shipment fallback, validity deferred to the caller's lookup
    log::debug!("Unrecognised scan token shape, deferring to lookup: {}", trimmed);
    Ok(ScanResult::Shipment {
        awb: trimmed.to_uppercase(),
        metadata: Metadata::new(),
        raw: input.to_string(),
    })
}

fn parse_envelope(trimmed: &str, raw: &str) -> ParseResult<ScanResult> {
    let envelope: ScanEnvelope =
        serde_json::from_str(trimmed).map_err(|e| ValidationError::MalformedEnvelope {
            message: e.to_string(),
        })?;

    if envelope.v != ENVELOPE_VERSION {
        return Err(ValidationError::UnsupportedVersion { found: envelope.v });
    }

    match envelope.entity_type.as_deref() {
        Some("manifest") => {
            if envelope.id.is_none() && envelope.manifest_no.is_none() {
                return Err(ValidationError::MissingIdentifier {
                    entity: "manifest",
                    field: "id or manifestNo",
                });
            }
            Ok(ScanResult::Manifest {
                manifest_id: envelope.id,
                manifest_no: envelope.manifest_no,
                route: envelope.route,
                metadata: envelope.meta,
                raw: raw.to_string(),
            })
        }
        Some("package") => {
            let package_id = envelope.package_id.ok_or(ValidationError::MissingIdentifier {
                entity: "package",
                field: "packageId",
            })?;
            Ok(ScanResult::Package {
                package_id,
                awb: envelope.awb.map(|a| a.to_uppercase()),
                metadata: envelope.meta,
                raw: raw.to_string(),
            })
        }
        // Absent or anything else: the shipment default branch, which
        // re-validates the embedded tracking code strictly.
        _ => {
            let awb = envelope.awb.ok_or(ValidationError::MissingIdentifier {
                entity: "shipment",
                field: "awb",
            })?;
            if !is_valid_awb(&awb) {
                return Err(ValidationError::InvalidTrackingCode { code: awb });
            }
            Ok(ScanResult::Shipment {
                awb: awb.to_uppercase(),
                metadata: envelope.meta,
                raw: raw.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_shipment(input: &str) -> String {
        match parse(input).unwrap() {
            ScanResult::Shipment { awb, .. } => awb,
            other => panic!("expected shipment for {:?}, got {:?}", input, other),
        }
    }

    fn expect_manifest(input: &str) -> (Option<String>, Option<String>) {
        match parse(input).unwrap() {
            ScanResult::Manifest {
                manifest_id,
                manifest_no,
                ..
            } => (manifest_id, manifest_no),
            other => panic!("expected manifest for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_raw_tracking_token() {
        assert_eq!(expect_shipment("TAC12345678"), "TAC12345678");
        assert_eq!(expect_shipment("tac12345678"), "TAC12345678");
        assert_eq!(expect_shipment("TCS12345678901"), "TCS12345678901");
        assert_eq!(expect_shipment("  TAC12345678  "), "TAC12345678");
    }

    #[test]
    fn test_hyphenated_tracking_token() {
        assert_eq!(expect_shipment("CN-2026-0042"), "CN-2026-0042");
        assert_eq!(expect_shipment("con-2025-9001"), "CON-2025-9001");
    }

    #[test]
    fn test_manifest_codes() {
        assert_eq!(
            expect_manifest("MAN-2024-00042"),
            (None, Some("MAN-2024-00042".to_string()))
        );
        assert_eq!(
            expect_manifest("mnf-2026-000001"),
            (None, Some("MNF-2026-000001".to_string()))
        );
        assert_eq!(
            expect_manifest("MFT-2026-000123"),
            (None, Some("MFT-2026-000123".to_string()))
        );
    }

    #[test]
    fn test_envelope_manifest() {
        let (id, no) =
            expect_manifest(r#"{"v":1,"type":"manifest","manifestNo":"MNF-2026-000001"}"#);
        assert_eq!(id, None);
        assert_eq!(no.as_deref(), Some("MNF-2026-000001"));
    }

    #[test]
    fn test_envelope_manifest_with_route_and_meta() {
        let input = r#"{"v":1,"type":"manifest","id":"m-77","route":"KHI-LHE","meta":{"bay":"7"}}"#;
        match parse(input).unwrap() {
            ScanResult::Manifest {
                manifest_id,
                route,
                metadata,
                raw,
                ..
            } => {
                assert_eq!(manifest_id.as_deref(), Some("m-77"));
                assert_eq!(route.as_deref(), Some("KHI-LHE"));
                assert_eq!(metadata.get("bay").and_then(|v| v.as_str()), Some("7"));
                assert_eq!(raw, input);
            }
            other => panic!("expected manifest, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_manifest_requires_identifier() {
        let err = parse(r#"{"v":1,"type":"manifest"}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingIdentifier {
                entity: "manifest",
                field: "id or manifestNo"
            }
        );
    }

    #[test]
    fn test_envelope_package() {
        let input = r#"{"v":1,"type":"package","packageId":"pkg-31","awb":"tac12345678"}"#;
        match parse(input).unwrap() {
            ScanResult::Package {
                package_id, awb, ..
            } => {
                assert_eq!(package_id, "pkg-31");
                assert_eq!(awb.as_deref(), Some("TAC12345678"));
            }
            other => panic!("expected package, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_package_requires_package_id() {
        let err = parse(r#"{"v":1,"type":"package","awb":"TAC12345678"}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingIdentifier {
                entity: "package",
                field: "packageId"
            }
        );
    }

    #[test]
    fn test_envelope_shipment_default_branch() {
        assert_eq!(
            expect_shipment(r#"{"v":1,"awb":"cn-2026-0042"}"#),
            "CN-2026-0042"
        );
    }

    #[test]
    fn test_envelope_shipment_requires_valid_awb() {
        let err = parse(r#"{"v":1,"awb":"NOPE-42"}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTrackingCode {
                code: "NOPE-42".to_string()
            }
        );

        let err = parse(r#"{"v":1}"#).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingIdentifier {
                entity: "shipment",
                field: "awb"
            }
        );
    }

    #[test]
    fn test_envelope_version_must_be_one() {
        let err = parse(r#"{"v":2,"awb":"TAC12345678"}"#).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedVersion { found: 2 });
    }

    #[test]
    fn test_envelope_parse_failure_is_validation_error() {
        let err = parse(r#"{"v":1,"awb":"#).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedEnvelope { .. }));

        // Missing version field is a malformed envelope, not a fallback
        let err = parse(r#"{"awb":"TAC12345678"}"#).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(parse("").unwrap_err(), ValidationError::EmptyInput);
        assert_eq!(parse("   ").unwrap_err(), ValidationError::EmptyInput);
    }

    #[test]
    fn test_unknown_shape_falls_through_to_shipment() {
        assert_eq!(expect_shipment("XYZ-UNKNOWN-FORMAT"), "XYZ-UNKNOWN-FORMAT");
        // Wrong digit counts miss the strict shapes and defer to lookup too
        assert_eq!(expect_shipment("TAC1234567"), "TAC1234567");
        assert_eq!(expect_shipment("CN-2026-042"), "CN-2026-042");
    }

    #[test]
    fn test_is_valid_awb() {
        assert!(is_valid_awb("TAC12345678"));
        assert!(is_valid_awb("tcs99999999999"));
        assert!(is_valid_awb("CN-2026-0042"));
        assert!(is_valid_awb("con-2026-0042"));
        assert!(!is_valid_awb("TAC1234567")); // 7 digits
        assert!(!is_valid_awb("TAC123456789012")); // 12 digits
        assert!(!is_valid_awb("MNF-2026-000001"));
        assert!(!is_valid_awb("XYZ-UNKNOWN-FORMAT"));
        assert!(!is_valid_awb(""));
    }
}
