//! Retrying Record Store Decorator
//!
//! Wraps any `RecordStore` and replays operations that fail with a transient
//! backend code. Retry behavior lives here so the audit engine never has to
//! reason about flaky connectivity.

use async_trait::async_trait;

use crate::core::retry::{retry_async, RetryPolicy};
use crate::store::error::{StoreError, StoreResult};
use crate::store::records::{ManifestRecord, ShipmentRecord, ShipmentStatus};
use crate::store::traits::RecordStore;

/// Backend codes treated as transient: rate limiting plus the 5xx family a
/// gateway or overloaded backend produces
pub const DEFAULT_TRANSIENT_CODES: &[u16] = &[429, 500, 502, 503, 504];

/// A `RecordStore` decorator that retries transient failures with
/// exponential backoff
pub struct RetryingStore<S: RecordStore> {
    inner: S,
    policy: RetryPolicy,
    transient_codes: Vec<u16>,
}

impl<S: RecordStore> RetryingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            policy: RetryPolicy::default(),
            transient_codes: DEFAULT_TRANSIENT_CODES.to_vec(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_transient_codes(mut self, codes: &[u16]) -> Self {
        self.transient_codes = codes.to_vec();
        self
    }

    fn is_transient(&self, error: &StoreError) -> bool {
        self.transient_codes.contains(&error.code)
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for RetryingStore<S> {
    async fn manifest_by_code(
        &self,
        org_id: &str,
        code: &str,
    ) -> StoreResult<Option<ManifestRecord>> {
        retry_async(
            "manifest_by_code",
            self.policy.clone(),
            |e: &StoreError| self.is_transient(e),
            || self.inner.manifest_by_code(org_id, code),
        )
        .await
    }

    async fn lines_for_manifest(&self, manifest_id: &str) -> StoreResult<Vec<ShipmentRecord>> {
        retry_async(
            "lines_for_manifest",
            self.policy.clone(),
            |e: &StoreError| self.is_transient(e),
            || self.inner.lines_for_manifest(manifest_id),
        )
        .await
    }

    async fn update_shipment_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> StoreResult<ShipmentRecord> {
        retry_async(
            "update_shipment_status",
            self.policy.clone(),
            |e: &StoreError| self.is_transient(e),
            || self.inner.update_shipment_status(shipment_id, status),
        )
        .await
    }
}
