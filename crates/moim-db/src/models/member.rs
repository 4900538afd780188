//! Member database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for gathering_members table
#[derive(Debug, Clone, FromRow)]
pub struct GatheringMemberModel {
    pub id: i64,
    pub gathering_id: i64,
    pub user_id: i64,
    pub role: String,
    pub status: String,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregated member counts per status (active rows only)
#[derive(Debug, Clone, FromRow)]
pub struct MemberCountsRow {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}
