//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests. Response structs
//! mirror only the fields the tests assert on.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Signup request
#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub profile: Option<String>,
    pub education_level: Option<String>,
    pub location: Option<String>,
}

impl SignupRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        Self {
            email: format!("test{suffix}.{nanos}@example.com"),
            username: format!("testuser{suffix}"),
            password: "TestPass123!".to_string(),
            profile: None,
            education_level: None,
            location: Some("Seoul".to_string()),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_signup(signup: &SignupRequest) -> Self {
        Self {
            email: signup.email.clone(),
            password: signup.password.clone(),
        }
    }
}

/// Token refresh request
#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Auth response with tokens
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUser,
}

/// Current user payload inside auth responses and /users/me
#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub joined_type: String,
    pub location: Option<String>,
}

/// Public user summary
#[derive(Debug, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
}

/// Create gathering request
#[derive(Debug, Serialize)]
pub struct CreateGatheringRequest {
    pub kind: String,
    pub category_id: String,
    pub title: String,
    pub description: String,
    pub max_members: i32,
    pub recruitment_end: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub meeting_schedule: Option<String>,
    pub study_type: String,
    pub location: Option<String>,
    pub target_level: String,
}

impl CreateGatheringRequest {
    pub fn study(category_id: &str) -> Self {
        let suffix = unique_suffix();
        let today = Utc::now().date_naive();
        Self {
            kind: "study".to_string(),
            category_id: category_id.to_string(),
            title: format!("Test Study {suffix}"),
            description: "A study group for integration testing".to_string(),
            max_members: 5,
            recruitment_end: today + Duration::days(14),
            start_date: today + Duration::days(21),
            end_date: None,
            meeting_schedule: Some("Every Saturday 10:00".to_string()),
            study_type: "online".to_string(),
            location: None,
            target_level: "all".to_string(),
        }
    }
}

/// Gathering response (summary fields)
#[derive(Debug, Deserialize)]
pub struct GatheringResponse {
    pub id: String,
    pub owner_id: String,
    pub category_id: String,
    pub kind: String,
    pub title: String,
    pub max_members: i32,
    pub current_members: i32,
    pub status: String,
}

/// Gathering detail with the viewer's membership status
#[derive(Debug, Deserialize)]
pub struct GatheringDetailResponse {
    pub id: String,
    pub title: String,
    pub status: String,
    pub current_members: i32,
    pub member_counts: MemberCounts,
    pub my_status: String,
}

/// Member counts by status
#[derive(Debug, Deserialize)]
pub struct MemberCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

/// Seat statistics for a gathering
#[derive(Debug, Deserialize)]
pub struct GatheringStatsResponse {
    pub gathering_id: String,
    pub member_counts: MemberCounts,
    pub current_members: i32,
    pub max_members: i32,
    pub remaining_seats: i32,
    pub is_full: bool,
}

/// Gathering member response
#[derive(Debug, Deserialize)]
pub struct MemberResponse {
    pub id: String,
    pub gathering_id: String,
    pub role: String,
    pub status: String,
    pub user: PublicUser,
}

/// The caller's own membership
#[derive(Debug, Deserialize)]
pub struct MyMembershipResponse {
    pub status: String,
    pub member: Option<MemberResponse>,
}

/// Cursor-paginated list payload
#[derive(Debug, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Deserialize)]
pub struct PaginationMeta {
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub limit: i64,
}

/// Create question request
#[derive(Debug, Serialize)]
pub struct CreateQuestionRequest {
    pub category_id: String,
    pub title: String,
    pub content: String,
}

impl CreateQuestionRequest {
    pub fn unique(category_id: &str) -> Self {
        let suffix = unique_suffix();
        Self {
            category_id: category_id.to_string(),
            title: format!("Test Question {suffix}"),
            content: "How do integration tests reach the database?".to_string(),
        }
    }
}

/// Question response
#[derive(Debug, Deserialize)]
pub struct QuestionResponse {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub is_solved: bool,
}

/// Answer response
#[derive(Debug, Deserialize)]
pub struct AnswerResponse {
    pub id: String,
    pub question_id: String,
    pub user_id: String,
    pub content: String,
}

/// Chat message response
#[derive(Debug, Deserialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub gathering_id: String,
    pub user_id: String,
    pub content: String,
}

/// Category response
#[derive(Debug, Deserialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub is_active: bool,
}
