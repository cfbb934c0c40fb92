//! AsyncNotificationManager implementation

use crate::notifications::error::NotificationError;
use crate::notifications::event::{Event, EventFilter};
use std::collections::HashMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

struct SubscriberInfo {
    filter: EventFilter,
    source: String,
    sender: UnboundedSender<Event>,
}

/// Fan-out publisher for audit events
///
/// Each audit engine owns one manager; subscribers receive events over
/// unbounded channels and are dropped automatically once their receiver
/// goes away.
pub struct AsyncNotificationManager {
    subscribers: HashMap<String, SubscriberInfo>,
}

impl Default for AsyncNotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncNotificationManager {
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
        }
    }

    pub fn subscribe(
        &mut self,
        subscriber_id: String,
        filter: EventFilter,
        source: String,
    ) -> UnboundedReceiver<Event> {
        let (sender, receiver) = unbounded_channel();

        let subscriber_info = SubscriberInfo {
            filter,
            source: source.clone(),
            sender,
        };

        // Warn if overwriting existing subscriber
        if let Some(existing) = self
            .subscribers
            .insert(subscriber_id.clone(), subscriber_info)
        {
            log::warn!(
                "Subscriber '{}' replaced existing subscription (source: {} -> {})",
                subscriber_id,
                existing.source,
                source
            );
        }

        receiver
    }

    pub fn unsubscribe(&mut self, subscriber_id: &str) -> bool {
        self.subscribers.remove(subscriber_id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn has_subscriber(&self, subscriber_id: &str) -> bool {
        self.subscribers.contains_key(subscriber_id)
    }

    pub async fn publish(&mut self, event: Event) -> Result<(), NotificationError> {
        let mut failed_subscribers = Vec::new();
        let event_type = match &event {
            Event::Session(_) => "Session",
            Event::Line(_) => "Line",
            Event::System(_) => "System",
        }
        .to_string();

        for (subscriber_id, subscriber_info) in &self.subscribers {
            if subscriber_info.filter.accepts(&event)
                && subscriber_info.sender.send(event.clone()).is_err()
            {
                // Channel is closed, mark for removal
                failed_subscribers.push(subscriber_id.clone());
            }
        }

        for subscriber_id in &failed_subscribers {
            self.subscribers.remove(subscriber_id);
        }

        if !failed_subscribers.is_empty() {
            return Err(NotificationError::PublishFailed {
                event_type,
                failed_subscribers,
            });
        }

        Ok(())
    }
}
