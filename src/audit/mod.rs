//! Arrival Audit Module
//!
//! Stateful coordinator for one receive/audit session: resolves a manifest,
//! turns a stream of scan inputs into manifest-line state transitions, and
//! exposes live aggregate counts. Idempotence and not-on-manifest rejection
//! are the load-bearing guarantees here; see `engine` for the transition
//! rules.

// Internal modules - all access should go through api module
pub(crate) mod engine;
pub(crate) mod error;
pub(crate) mod feedback;
pub(crate) mod types;

// Public API module - the only public interface for the audit system
pub mod api;
