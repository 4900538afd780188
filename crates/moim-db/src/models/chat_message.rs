//! Chat message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for chat_messages table
#[derive(Debug, Clone, FromRow)]
pub struct ChatMessageModel {
    pub id: i64,
    pub gathering_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
