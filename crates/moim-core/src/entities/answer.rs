//! Answer entity - a reply to a question

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Answer entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub id: Snowflake,
    pub question_id: Snowflake,
    pub user_id: Snowflake,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Answer {
    pub fn new(id: Snowflake, question_id: Snowflake, user_id: Snowflake, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            question_id,
            user_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}
