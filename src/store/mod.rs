//! Record Store
//!
//! The persistence seam of the audit core. The hosted backend is reached
//! through the [`RecordStore`] trait; this module also provides the
//! reliable-call wrapper that retries transient failures and an in-memory
//! implementation used by the binary and the test suite.

pub mod error;
pub mod memory;
pub mod records;
pub mod retrying;
pub mod traits;

// Public API module - the preferred interface for other modules
pub mod api;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use records::{ManifestRecord, ShipmentRecord, ShipmentStatus};
pub use retrying::RetryingStore;
pub use traits::RecordStore;
