//! Store API
//!
//! This module provides the public API for the record-store layer,
//! consolidating all external exports and providing a controlled interface
//! for accessing store functionality.

// The persistence seam
pub use crate::store::traits::RecordStore;

// Record models
pub use crate::store::records::{ManifestRecord, ShipmentRecord, ShipmentStatus};

// Implementations
pub use crate::store::memory::{MemoryStore, SeedData};
pub use crate::store::retrying::{RetryingStore, DEFAULT_TRANSIENT_CODES};

// Error handling
pub use crate::store::error::{StoreError, StoreResult};
