//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use moim_core::{
    Answer, Category, ChatMessage, Gathering, GatheringMember, MemberCounts, Question, User,
};

// ============================================================================
// Common Response Types
// ============================================================================

/// Paginated response with cursor-based pagination
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, next_cursor: Option<String>, has_more: bool, limit: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                next_cursor,
                has_more,
                limit,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Cursor for fetching the next page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Whether more results exist
    pub has_more: bool,
    /// Page size limit used
    pub limit: i64,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: CurrentUserResponse,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: CurrentUserResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            user,
        }
    }
}

/// Acknowledgement for a sent verification code
#[derive(Debug, Serialize)]
pub struct VerificationSentResponse {
    pub email: String,
    /// Code lifetime in seconds
    pub expires_in: u64,
}

// ============================================================================
// User Responses
// ============================================================================

/// Current authenticated user response (includes email)
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub joined_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role.as_str().to_string(),
            joined_type: user.joined_type.as_str().to_string(),
            profile: user.profile.clone(),
            education_level: user.education_level.clone(),
            location: user.location.clone(),
            created_at: user.created_at,
        }
    }
}

/// Public user response (for viewing other users)
#[derive(Debug, Clone, Serialize)]
pub struct PublicUserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            profile: user.profile.clone(),
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Category Responses
// ============================================================================

/// Category response
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            parent_id: category.parent_id.map(|id| id.to_string()),
            name: category.name.clone(),
            description: category.description.clone(),
            is_active: category.is_active,
            created_at: category.created_at,
        }
    }
}

// ============================================================================
// Gathering Responses
// ============================================================================

/// Gathering response
#[derive(Debug, Clone, Serialize)]
pub struct GatheringResponse {
    pub id: String,
    pub owner_id: String,
    pub category_id: String,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub max_members: i32,
    pub current_members: i32,
    pub recruitment_end: NaiveDate,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_schedule: Option<String>,
    pub study_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub target_level: String,
    pub has_cost: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_description: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Gathering> for GatheringResponse {
    fn from(g: &Gathering) -> Self {
        Self {
            id: g.id.to_string(),
            owner_id: g.owner_id.to_string(),
            category_id: g.category_id.to_string(),
            kind: g.kind.as_str().to_string(),
            title: g.title.clone(),
            description: g.description.clone(),
            max_members: g.max_members,
            current_members: g.current_members,
            recruitment_end: g.recruitment_end,
            start_date: g.start_date,
            end_date: g.end_date,
            meeting_schedule: g.meeting_schedule.clone(),
            study_type: g.study_type.as_str().to_string(),
            location: g.location.clone(),
            target_level: g.target_level.as_str().to_string(),
            has_cost: g.has_cost,
            cost_description: g.cost_description.clone(),
            status: g.status.as_str().to_string(),
            required_skills: g.required_skills.clone(),
            project_goal: g.project_goal.clone(),
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

/// Member counts by status
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemberCountsResponse {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

impl From<MemberCounts> for MemberCountsResponse {
    fn from(counts: MemberCounts) -> Self {
        Self {
            pending: counts.pending,
            approved: counts.approved,
            rejected: counts.rejected,
        }
    }
}

/// Seat and application statistics for a gathering
#[derive(Debug, Serialize)]
pub struct GatheringStatsResponse {
    pub gathering_id: String,
    pub member_counts: MemberCountsResponse,
    pub current_members: i32,
    pub max_members: i32,
    pub remaining_seats: i32,
    pub is_full: bool,
}

impl GatheringStatsResponse {
    pub fn new(gathering: &Gathering, counts: MemberCounts) -> Self {
        Self {
            gathering_id: gathering.id.to_string(),
            member_counts: counts.into(),
            current_members: gathering.current_members,
            max_members: gathering.max_members,
            remaining_seats: gathering.remaining_seats(),
            is_full: gathering.is_full(),
        }
    }
}

/// Gathering detail with member statistics and the viewer's membership
#[derive(Debug, Serialize)]
pub struct GatheringDetailResponse {
    #[serde(flatten)]
    pub gathering: GatheringResponse,
    pub member_counts: MemberCountsResponse,
    /// "not_member", "pending", "approved", "rejected", or "owner"
    pub my_status: String,
}

// ============================================================================
// Member Responses
// ============================================================================

/// Gathering member with user summary
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub gathering_id: String,
    pub role: String,
    pub status: String,
    pub joined_at: DateTime<Utc>,
    pub user: PublicUserResponse,
}

impl MemberResponse {
    pub fn new(member: &GatheringMember, user: &User) -> Self {
        Self {
            id: member.id.to_string(),
            gathering_id: member.gathering_id.to_string(),
            role: member.role.as_str().to_string(),
            status: member.status.as_str().to_string(),
            joined_at: member.joined_at,
            user: PublicUserResponse::from(user),
        }
    }
}

/// The caller's own membership in a gathering
#[derive(Debug, Serialize)]
pub struct MyMembershipResponse {
    /// "not_member", "pending", "approved", "rejected", or "owner"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<MemberResponse>,
}

// ============================================================================
// Question Responses
// ============================================================================

/// Question summary for listings
#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub is_solved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Question> for QuestionResponse {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.to_string(),
            user_id: q.user_id.to_string(),
            category_id: q.category_id.to_string(),
            title: q.title.clone(),
            content: q.content.clone(),
            view_count: q.view_count,
            is_solved: q.is_solved,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

/// Question detail with its answers
#[derive(Debug, Serialize)]
pub struct QuestionDetailResponse {
    #[serde(flatten)]
    pub question: QuestionResponse,
    pub answers: Vec<AnswerResponse>,
}

/// Answer response
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub id: String,
    pub question_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Answer> for AnswerResponse {
    fn from(a: &Answer) -> Self {
        Self {
            id: a.id.to_string(),
            question_id: a.question_id.to_string(),
            user_id: a.user_id.to_string(),
            content: a.content.clone(),
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

// ============================================================================
// Chat Responses
// ============================================================================

/// Chat message response
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct ChatMessageResponse {
    pub id: String,
    pub gathering_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(m: &ChatMessage) -> Self {
        Self {
            id: m.id.to_string(),
            gathering_id: m.gathering_id.to_string(),
            user_id: m.user_id.to_string(),
            content: m.content.clone(),
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moim_core::{JoinedType, Snowflake};

    #[test]
    fn test_snowflake_ids_serialize_as_strings() {
        let user = User::new(
            Snowflake::new(9_007_199_254_740_993),
            "a@example.com".to_string(),
            "alice".to_string(),
            JoinedType::Normal,
        );
        let resp = CurrentUserResponse::from(&user);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["id"], "9007199254740993");
        assert_eq!(json["role"], "user");
        assert_eq!(json["joined_type"], "normal");
    }

    #[test]
    fn test_pagination_meta() {
        let page = PaginatedResponse::new(vec![1, 2, 3], Some("100".to_string()), true, 3);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["pagination"]["next_cursor"], "100");
        assert_eq!(json["pagination"]["has_more"], true);
    }
}
