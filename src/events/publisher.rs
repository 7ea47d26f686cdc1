use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tracing::trace;

/// Flag state a record moved into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagState {
    On,
    Off,
}

/// Notification emitted after a single record's flag was persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagEvent {
    /// Family event name, e.g. `published` or `unarchived`
    pub name: String,
    pub model: String,
    pub table: String,
    pub record_id: i64,
    /// Key of the flag family
    pub flag: String,
    pub state: FlagState,
    pub published_at: DateTime<Utc>,
}

impl FlagEvent {
    /// JSON context handed to subscribers that work with untyped payloads
    pub fn context(&self) -> Value {
        json!({
            "event": self.name,
            "model": self.model,
            "table": self.table,
            "record_id": self.record_id,
            "flag": self.flag,
            "state": self.state,
            "published_at": self.published_at.to_rfc3339(),
        })
    }
}

/// Broadcast publisher for flag lifecycle events
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<FlagEvent>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event, returning how many subscribers received it.
    /// Publishing with nobody listening is not an error.
    pub fn publish(&self, event: FlagEvent) -> usize {
        trace!(event = %event.name, record_id = event.record_id, "publishing flag event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<FlagEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(1000)
    }
}
