//! Scan Classification Types
//!
//! Shared types produced by the scan input parser.

use serde_json::{Map, Value};

/// Open key-value bag carried through from structured input, opaque to the
/// parser
pub type Metadata = Map<String, Value>;

/// Classified scan input
///
/// Each variant carries exactly the identifier fields relevant to the
/// resolved entity type, which makes the per-type invariants structural: a
/// shipment scan always has a tracking code, a package scan always has a
/// package id, a manifest scan always has at least one of its identifiers
/// (enforced at parse time). `raw` always retains the original input for
/// audit and debugging.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanResult {
    Shipment {
        awb: String,
        metadata: Metadata,
        raw: String,
    },
    Manifest {
        manifest_id: Option<String>,
        manifest_no: Option<String>,
        route: Option<String>,
        metadata: Metadata,
        raw: String,
    },
    Package {
        package_id: String,
        awb: Option<String>,
        metadata: Metadata,
        raw: String,
    },
}

impl ScanResult {
    /// Original input string as scanned
    pub fn raw(&self) -> &str {
        match self {
            ScanResult::Shipment { raw, .. }
            | ScanResult::Manifest { raw, .. }
            | ScanResult::Package { raw, .. } => raw,
        }
    }

    /// Tracking code carried by this scan, if any
    pub fn awb(&self) -> Option<&str> {
        match self {
            ScanResult::Shipment { awb, .. } => Some(awb),
            ScanResult::Package { awb, .. } => awb.as_deref(),
            ScanResult::Manifest { .. } => None,
        }
    }

    /// Human-readable entity type name
    pub fn kind(&self) -> &'static str {
        match self {
            ScanResult::Shipment { .. } => "shipment",
            ScanResult::Manifest { .. } => "manifest",
            ScanResult::Package { .. } => "package",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let scan = ScanResult::Shipment {
            awb: "TAC12345678".to_string(),
            metadata: Metadata::new(),
            raw: "tac12345678".to_string(),
        };
        assert_eq!(scan.raw(), "tac12345678");
        assert_eq!(scan.awb(), Some("TAC12345678"));
        assert_eq!(scan.kind(), "shipment");

        let scan = ScanResult::Manifest {
            manifest_id: Some("m-1".to_string()),
            manifest_no: None,
            route: None,
            metadata: Metadata::new(),
            raw: "{}".to_string(),
        };
        assert_eq!(scan.awb(), None);
        assert_eq!(scan.kind(), "manifest");
    }
}
