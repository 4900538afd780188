//! Gathering database model

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database model for gatherings table
#[derive(Debug, Clone, FromRow)]
pub struct GatheringModel {
    pub id: i64,
    pub owner_id: i64,
    pub category_id: i64,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub max_members: i32,
    pub current_members: i32,
    pub recruitment_end: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub meeting_schedule: Option<String>,
    pub study_type: String,
    pub location: Option<String>,
    pub target_level: String,
    pub has_cost: bool,
    pub cost_description: Option<String>,
    pub status: String,
    pub required_skills: Option<String>,
    pub project_goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
