//! Question database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for questions table
#[derive(Debug, Clone, FromRow)]
pub struct QuestionModel {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub is_solved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
