//! Record Store Trait
//!
//! The seam between the audit core and the hosted backend. Implementations
//! are expected to be cheap to clone behind an `Arc` and safe to share; the
//! engine holds one for the life of a session.

use std::sync::Arc;

use async_trait::async_trait;

use crate::store::error::StoreResult;
use crate::store::records::{ManifestRecord, ShipmentRecord, ShipmentStatus};

/// Query/update surface of the record store
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Resolve a manifest by UUID or human manifest number, scoped to one
    /// organization. Matching is case-insensitive; `Ok(None)` means nothing
    /// matched within the org.
    async fn manifest_by_code(
        &self,
        org_id: &str,
        code: &str,
    ) -> StoreResult<Option<ManifestRecord>>;

    /// All shipment records expected on the given manifest
    async fn lines_for_manifest(&self, manifest_id: &str) -> StoreResult<Vec<ShipmentRecord>>;

    /// Persist a shipment lifecycle transition, returning the stored record
    /// as the backend now sees it
    async fn update_shipment_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> StoreResult<ShipmentRecord>;
}

// Shared handles are stores too; callers can keep an `Arc` for observation
// while handing another to a decorator.
#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn manifest_by_code(
        &self,
        org_id: &str,
        code: &str,
    ) -> StoreResult<Option<ManifestRecord>> {
        self.as_ref().manifest_by_code(org_id, code).await
    }

    async fn lines_for_manifest(&self, manifest_id: &str) -> StoreResult<Vec<ShipmentRecord>> {
        self.as_ref().lines_for_manifest(manifest_id).await
    }

    async fn update_shipment_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> StoreResult<ShipmentRecord> {
        self.as_ref().update_shipment_status(shipment_id, status).await
    }
}
