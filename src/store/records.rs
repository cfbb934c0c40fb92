//! Record Store Data Models
//!
//! Serde models of the records the audit core reads and writes. The record
//! store is the system of record; everything here is a typed view of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Shipment lifecycle status as persisted by the record store
///
/// The audit engine only ever writes `Received` (from a successful scan) and
/// `Exception` (from the out-of-band exception action); the remaining states
/// are written by other parts of the wider system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShipmentStatus {
    Booked,
    InTransit,
    Received,
    Exception,
    Delivered,
}

/// One shipment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ShipmentRecord {
    pub id: String,
    pub tracking_code: String,
    pub consignee: String,
    pub package_count: u32,
    pub weight_kg: f64,
    pub status: ShipmentStatus,
    #[serde(default)]
    pub manifest_id: Option<String>,
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
}

/// One manifest record: a batch of shipments moving together between two hubs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ManifestRecord {
    pub id: String,
    pub manifest_no: String,
    pub org_id: String,
    pub origin: String,
    pub destination: String,
}
