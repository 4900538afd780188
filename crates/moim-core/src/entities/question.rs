//! Question entity - community Q&A post

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Question entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: Snowflake,
    pub user_id: Snowflake,
    pub category_id: Snowflake,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub is_solved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn new(
        id: Snowflake,
        user_id: Snowflake,
        category_id: Snowflake,
        title: String,
        content: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            category_id,
            title,
            content,
            view_count: 0,
            is_solved: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_author(&self, user_id: Snowflake) -> bool {
        self.user_id == user_id
    }

    pub fn set_solved(&mut self, solved: bool) {
        self.is_solved = solved;
        self.updated_at = Utc::now();
    }
}
