//! In-Memory Record Store
//!
//! Backing store for the interactive binary and the test suite. Holds plain
//! vectors behind async locks; the hosted backend this stands in for is out
//! of scope.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

use crate::store::error::{StoreError, StoreResult};
use crate::store::records::{ManifestRecord, ShipmentRecord, ShipmentStatus};
use crate::store::traits::RecordStore;

/// Seed fixture: the records a `MemoryStore` starts with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub manifests: Vec<ManifestRecord>,
    #[serde(default)]
    pub shipments: Vec<ShipmentRecord>,
}

impl SeedData {
    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| StoreError::new(400, format!("Invalid seed data: {}", e)))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    manifests: RwLock<Vec<ManifestRecord>>,
    shipments: RwLock<Vec<ShipmentRecord>>,
    // Fault injected by tests: consumed by the next update call
    fault: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: SeedData) -> Self {
        Self {
            manifests: RwLock::new(seed.manifests),
            shipments: RwLock::new(seed.shipments),
            fault: Mutex::new(None),
        }
    }

    pub async fn insert_manifest(&self, manifest: ManifestRecord) {
        self.manifests.write().await.push(manifest);
    }

    pub async fn insert_shipment(&self, shipment: ShipmentRecord) {
        self.shipments.write().await.push(shipment);
    }

    /// Make the next `update_shipment_status` call fail with the given error
    pub async fn inject_fault(&self, error: StoreError) {
        *self.fault.lock().await = Some(error);
    }

    /// Current status of a shipment, as tests observe the system of record
    pub async fn shipment_status(&self, shipment_id: &str) -> Option<ShipmentStatus> {
        self.shipments
            .read()
            .await
            .iter()
            .find(|s| s.id == shipment_id)
            .map(|s| s.status)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn manifest_by_code(
        &self,
        org_id: &str,
        code: &str,
    ) -> StoreResult<Option<ManifestRecord>> {
        let manifests = self.manifests.read().await;
        Ok(manifests
            .iter()
            .find(|m| {
                m.org_id == org_id
                    && (m.id.eq_ignore_ascii_case(code) || m.manifest_no.eq_ignore_ascii_case(code))
            })
            .cloned())
    }

    async fn lines_for_manifest(&self, manifest_id: &str) -> StoreResult<Vec<ShipmentRecord>> {
        let shipments = self.shipments.read().await;
        Ok(shipments
            .iter()
            .filter(|s| s.manifest_id.as_deref() == Some(manifest_id))
            .cloned()
            .collect())
    }

    async fn update_shipment_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> StoreResult<ShipmentRecord> {
        if let Some(error) = self.fault.lock().await.take() {
            return Err(error);
        }

        let mut shipments = self.shipments.write().await;
        let shipment = shipments
            .iter_mut()
            .find(|s| s.id == shipment_id)
            .ok_or_else(|| StoreError::not_found(format!("No shipment {}", shipment_id)))?;

        shipment.status = status;
        if status == ShipmentStatus::Received {
            shipment.received_at = Some(Utc::now());
        }
        Ok(shipment.clone())
    }
}
