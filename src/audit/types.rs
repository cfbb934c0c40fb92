//! Audit Session Types

use strum_macros::Display;

use crate::store::records::{ShipmentRecord, ShipmentStatus};

/// Caller identity: every manifest resolution is scoped to one organization
///
/// Passed in explicitly when the engine is constructed; the engine never
/// consults ambient state for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgContext {
    pub org_id: String,
}

impl OrgContext {
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
        }
    }
}

/// Session-scoped status of one manifest line
///
/// `Pending` may move to `Scanned` (successful scan) or to `Exception`
/// (out-of-band marking); both of those are terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LineStatus {
    Pending,
    Scanned,
    Exception,
}

impl LineStatus {
    /// Initial session status derived from the shipment's lifecycle status:
    /// a shipment already received at destination starts the session as
    /// scanned, a flagged one as exception, everything else as pending.
    pub fn from_shipment_status(status: ShipmentStatus) -> Self {
        match status {
            ShipmentStatus::Received | ShipmentStatus::Delivered => LineStatus::Scanned,
            ShipmentStatus::Exception => LineStatus::Exception,
            ShipmentStatus::Booked | ShipmentStatus::InTransit => LineStatus::Pending,
        }
    }
}

/// One expected consignment on the active manifest
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestLine {
    pub shipment_id: String,
    pub tracking_code: String,
    pub consignee: String,
    pub package_count: u32,
    pub weight_kg: f64,
    pub status: LineStatus,
}

impl ManifestLine {
    pub fn from_record(record: &ShipmentRecord) -> Self {
        Self {
            shipment_id: record.id.clone(),
            tracking_code: record.tracking_code.clone(),
            consignee: record.consignee.clone(),
            package_count: record.package_count,
            weight_kg: record.weight_kg,
            status: LineStatus::from_shipment_status(record.status),
        }
    }
}

/// Aggregate counts over the active session's lines
///
/// Always recomputed from the line set; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuditStats {
    pub total: usize,
    pub scanned: usize,
    pub missing: usize,
    pub exceptions: usize,
}

impl AuditStats {
    pub fn from_lines(lines: &[ManifestLine]) -> Self {
        let mut stats = AuditStats {
            total: lines.len(),
            ..Default::default()
        };
        for line in lines {
            match line.status {
                LineStatus::Pending => stats.missing += 1,
                LineStatus::Scanned => stats.scanned += 1,
                LineStatus::Exception => stats.exceptions += 1,
            }
        }
        stats
    }
}

/// Successful outcome of `apply_scan`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Input opened a session instead of receiving a line
    SessionOpened { manifest_no: String, total: usize },
    /// Line transitioned to scanned and the transition was persisted
    Scanned { awb: String },
    /// Line was already in a terminal state; nothing changed
    Duplicate { awb: String },
    /// Line was marked as an exception out of band
    ExceptionMarked { awb: String },
}

impl ScanOutcome {
    /// Operator-facing confirmation message
    pub fn message(&self) -> String {
        match self {
            ScanOutcome::SessionOpened { manifest_no, total } => {
                format!("Auditing manifest {} ({} expected items)", manifest_no, total)
            }
            ScanOutcome::Scanned { awb } => format!("Received {}", awb),
            ScanOutcome::Duplicate { awb } => format!("{} was already recorded", awb),
            ScanOutcome::ExceptionMarked { awb } => format!("Marked {} as exception", awb),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, ScanOutcome::Duplicate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(status: LineStatus) -> ManifestLine {
        ManifestLine {
            shipment_id: "shp-1".to_string(),
            tracking_code: "TAC12345678".to_string(),
            consignee: "Test".to_string(),
            package_count: 1,
            weight_kg: 1.0,
            status,
        }
    }

    #[test]
    fn test_initial_status_mapping() {
        assert_eq!(
            LineStatus::from_shipment_status(ShipmentStatus::InTransit),
            LineStatus::Pending
        );
        assert_eq!(
            LineStatus::from_shipment_status(ShipmentStatus::Received),
            LineStatus::Scanned
        );
        assert_eq!(
            LineStatus::from_shipment_status(ShipmentStatus::Delivered),
            LineStatus::Scanned
        );
        assert_eq!(
            LineStatus::from_shipment_status(ShipmentStatus::Exception),
            LineStatus::Exception
        );
    }

    #[test]
    fn test_stats_partition_lines() {
        let lines = vec![
            line(LineStatus::Pending),
            line(LineStatus::Pending),
            line(LineStatus::Scanned),
            line(LineStatus::Exception),
        ];

        let stats = AuditStats::from_lines(&lines);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.scanned, 1);
        assert_eq!(stats.missing, 2);
        assert_eq!(stats.exceptions, 1);
        assert_eq!(
            stats.total,
            stats.scanned + stats.missing + stats.exceptions
        );
    }

    #[test]
    fn test_outcome_messages() {
        let opened = ScanOutcome::SessionOpened {
            manifest_no: "MNF-2026-000001".to_string(),
            total: 12,
        };
        assert!(opened.message().contains("MNF-2026-000001"));
        assert!(!opened.is_duplicate());

        let duplicate = ScanOutcome::Duplicate {
            awb: "TAC12345678".to_string(),
        };
        assert!(duplicate.message().contains("already"));
        assert!(duplicate.is_duplicate());
    }
}
