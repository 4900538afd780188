//! Redis Pub/Sub publisher.
//!
//! Publishes chat events to Redis channels for distribution to WebSocket clients.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Event type name (e.g., "MESSAGE_CREATE")
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl ChatEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Create a message create event
    #[must_use]
    pub fn message_create(data: serde_json::Value) -> Self {
        Self::new("MESSAGE_CREATE", data)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel
    pub async fn publish(&self, channel: &PubSubChannel, event: &ChatEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    /// Publish a persisted chat message to its gathering's room
    pub async fn publish_chat_message(
        &self,
        gathering_id: moim_core::Snowflake,
        message_data: serde_json::Value,
    ) -> RedisResult<u32> {
        let event = ChatEvent::message_create(message_data);
        let channel = PubSubChannel::chat(gathering_id);
        self.publish(&channel, &event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ChatEvent::message_create(serde_json::json!({"content": "hello"}));
        let json = event.to_json().unwrap();

        assert!(json.contains("MESSAGE_CREATE"));
        assert!(json.contains("hello"));

        let parsed: ChatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.event_type, "MESSAGE_CREATE");
    }
}
