//! Chat message entity - a message in a gathering's chat room

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Chat message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Snowflake,
    pub gathering_id: Snowflake,
    pub user_id: Snowflake,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Maximum message length in characters
    pub const MAX_LENGTH: usize = 1000;

    pub fn new(id: Snowflake, gathering_id: Snowflake, user_id: Snowflake, content: String) -> Self {
        Self {
            id,
            gathering_id,
            user_id,
            content,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorship() {
        let m = ChatMessage::new(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            "hello".to_string(),
        );
        assert!(m.is_author(Snowflake::new(3)));
        assert!(!m.is_author(Snowflake::new(4)));
    }
}
