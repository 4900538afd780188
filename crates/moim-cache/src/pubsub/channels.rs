//! Pub/Sub channel definitions.
//!
//! Defines the channel naming conventions for Redis Pub/Sub.

use moim_core::Snowflake;

/// Channel prefix for per-gathering chat rooms
pub const CHAT_CHANNEL_PREFIX: &str = "chat:";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Chat room of a specific gathering
    Chat(Snowflake),
}

impl PubSubChannel {
    /// Create a gathering chat channel
    #[must_use]
    pub fn chat(gathering_id: Snowflake) -> Self {
        Self::Chat(gathering_id)
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Chat(id) => format!("{CHAT_CHANNEL_PREFIX}{id}"),
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_names() {
        let gathering_id = Snowflake::from(12345i64);

        assert_eq!(PubSubChannel::chat(gathering_id).name(), "chat:12345");
    }
}
