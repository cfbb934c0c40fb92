//! Public API for the notification system
//!
//! This module provides the complete public API for the notification system.
//! External modules should import from here rather than directly from
//! internal modules. There is no global service: each `ArrivalAuditEngine`
//! owns its manager and hands out receivers through `subscribe`.

// Core event types and enums
pub use crate::notifications::event::{
    Event, EventFilter, LineEvent, LineEventType, SessionEvent, SessionEventType, SystemEvent,
    SystemEventType,
};

// Manager and utilities
pub use crate::notifications::error::NotificationError;
pub use crate::notifications::manager::AsyncNotificationManager;
