//! Topic-based change notifications.
//!
//! Owners of mutable state (the preset store, anything that edits people or
//! their tasks) publish an [`Event`] on an [`EventBus`] after a change; views
//! that cache filtered results subscribe to the topics they depend on and
//! re-run their filters.
//!
//! Publishing never blocks and never fails: with no subscribers the event is
//! dropped. A subscriber that falls behind skips the events it missed.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Default number of buffered events per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// What changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    /// A task was created, edited or completed.
    TaskUpdated,
    /// A note was added or removed.
    NotesUpdated,
    /// A saved filter list was replaced.
    PresetsChanged,
    /// Attendee records were edited.
    PeopleUpdated,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::TaskUpdated => "taskUpdated",
            Topic::NotesUpdated => "notesUpdated",
            Topic::PresetsChanged => "presetsChanged",
            Topic::PeopleUpdated => "peopleUpdated",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub topic: Topic,
    /// What the change applies to: a person id, a view type, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Event {
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            subject: None,
        }
    }

    pub fn with_subject(topic: Topic, subject: impl Into<String>) -> Self {
        Self {
            topic,
            subject: Some(subject.into()),
        }
    }
}

/// Broadcast bus for [`Event`]s. Clones publish to the same subscribers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per subscriber.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event, returning how many subscribers will see it.
    pub fn publish(&self, event: Event) -> usize {
        // Sending only fails when nobody is listening.
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribes to the given topics. An empty slice subscribes to every topic.
    pub fn subscribe(&self, topics: &[Topic]) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
            topics: topics.to_vec(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Receives events for a set of topics.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<Event>,
    topics: Vec<Topic>,
}

impl Subscription {
    /// Waits for the next matching event. Returns `None` once every bus
    /// handle is dropped.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(event.topic) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "event subscriber lagged; skipping missed events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next matching event if one is already queued.
    pub fn try_recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.wants(event.topic) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "event subscriber lagged; skipping missed events");
                }
                Err(_) => return None,
            }
        }
    }

    fn wants(&self, topic: Topic) -> bool {
        self.topics.is_empty() || self.topics.contains(&topic)
    }
}
