//! Event types for the notification system

use std::time::SystemTime;

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEventType {
    Opened,
    Refreshed,
    Cleared,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LineEventType {
    Scanned,
    Duplicate,
    Rejected,
    ExceptionMarked,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SystemEventType {
    Startup,
    Shutdown,
}

/// Individual event types that can be published
#[derive(Clone, Debug)]
pub struct SessionEvent {
    pub event_type: SessionEventType,
    pub timestamp: SystemTime,
    pub manifest_no: String,
    pub message: Option<String>,
}

impl SessionEvent {
    pub fn new(event_type: SessionEventType, manifest_no: String) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            manifest_no,
            message: None,
        }
    }

    pub fn with_message(
        event_type: SessionEventType,
        manifest_no: String,
        message: String,
    ) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            manifest_no,
            message: Some(message),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LineEvent {
    pub event_type: LineEventType,
    pub timestamp: SystemTime,
    pub manifest_no: String,
    pub awb: String,
    pub message: Option<String>,
}

impl LineEvent {
    pub fn new(event_type: LineEventType, manifest_no: String, awb: String) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            manifest_no,
            awb,
            message: None,
        }
    }

    pub fn with_message(
        event_type: LineEventType,
        manifest_no: String,
        awb: String,
        message: String,
    ) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            manifest_no,
            awb,
            message: Some(message),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SystemEvent {
    pub event_type: SystemEventType,
    pub timestamp: SystemTime,
    pub message: Option<String>,
}

impl SystemEvent {
    pub fn new(event_type: SystemEventType) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            message: None,
        }
    }

    pub fn with_message(event_type: SystemEventType, message: String) -> Self {
        Self {
            event_type,
            timestamp: SystemTime::now(),
            message: Some(message),
        }
    }
}

/// Unified event enum that encompasses all event types
#[derive(Clone, Debug)]
pub enum Event {
    Session(SessionEvent),
    Line(LineEvent),
    System(SystemEvent),
}

/// Event filtering options for subscribers
#[derive(Clone, Debug, PartialEq)]
pub enum EventFilter {
    SessionOnly,
    LineOnly,
    SystemOnly,
    SessionAndLine,
    All,
}

impl EventFilter {
    /// Check if an event should be accepted by this filter
    pub fn accepts(&self, event: &Event) -> bool {
        matches!(
            (self, event),
            (EventFilter::SessionOnly, Event::Session(_))
                | (EventFilter::LineOnly, Event::Line(_))
                | (EventFilter::SystemOnly, Event::System(_))
                | (EventFilter::SessionAndLine, Event::Session(_))
                | (EventFilter::SessionAndLine, Event::Line(_))
                | (EventFilter::All, _)
        )
    }
}
