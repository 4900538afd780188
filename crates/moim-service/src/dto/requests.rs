//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Snowflake IDs arrive as strings.

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 2, max = 50, message = "Username must be 2-50 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(max = 1000, message = "Profile must be at most 1000 characters"))]
    pub profile: Option<String>,

    #[validate(length(max = 50, message = "Education level must be at most 50 characters"))]
    pub education_level: Option<String>,

    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request (optional refresh token to revoke)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

/// Request a verification code by email
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendVerificationRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Submit a verification code
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    pub code: String,
}

/// Kakao OAuth login with an authorization code
#[derive(Debug, Clone, Deserialize)]
pub struct KakaoLoginRequest {
    pub code: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Update current user profile
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 50, message = "Username must be 2-50 characters"))]
    pub username: Option<String>,

    #[validate(length(max = 1000, message = "Profile must be at most 1000 characters"))]
    pub profile: Option<String>,

    #[validate(length(max = 50, message = "Education level must be at most 50 characters"))]
    pub education_level: Option<String>,

    #[validate(length(max = 100, message = "Location must be at most 100 characters"))]
    pub location: Option<String>,
}

/// Change password request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub new_password: String,
}

/// Account deletion request (password re-check)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeleteAccountRequest {
    pub password: Option<String>,
}

// ============================================================================
// Category Requests
// ============================================================================

/// Create category request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Parent category ID (Snowflake as string), null for a root category
    pub parent_id: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Update category request
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub is_active: Option<bool>,
}

// ============================================================================
// Gathering Requests
// ============================================================================

/// Create gathering request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGatheringRequest {
    /// "study" or "project"
    pub kind: String,

    /// Category ID (Snowflake as string)
    pub category_id: String,

    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: String,

    #[validate(range(min = 2, max = 100, message = "Capacity must be 2-100"))]
    pub max_members: i32,

    pub recruitment_end: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 200, message = "Schedule must be at most 200 characters"))]
    pub meeting_schedule: Option<String>,

    /// "online", "offline", or "mixed"
    pub study_type: String,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    /// "beginner", "intermediate", "advanced", or "all"
    pub target_level: String,

    #[serde(default)]
    pub has_cost: bool,

    #[validate(length(max = 200, message = "Cost description must be at most 200 characters"))]
    pub cost_description: Option<String>,

    pub required_skills: Option<String>,
    pub project_goal: Option<String>,
}

/// Update gathering request
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateGatheringRequest {
    /// Category ID (Snowflake as string)
    pub category_id: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 2, max = 100, message = "Capacity must be 2-100"))]
    pub max_members: Option<i32>,

    pub recruitment_end: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(length(max = 200, message = "Schedule must be at most 200 characters"))]
    pub meeting_schedule: Option<String>,

    pub study_type: Option<String>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    pub target_level: Option<String>,

    pub has_cost: Option<bool>,

    #[validate(length(max = 200, message = "Cost description must be at most 200 characters"))]
    pub cost_description: Option<String>,

    pub required_skills: Option<String>,
    pub project_goal: Option<String>,
}

/// Owner-driven status transition
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGatheringStatusRequest {
    /// Target status string
    pub status: String,
}

/// Query parameters for gathering listings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GatheringListQuery {
    pub kind: Option<String>,
    pub category_id: Option<String>,
    pub status: Option<String>,
    pub study_type: Option<String>,
    pub target_level: Option<String>,
    pub is_recruiting: Option<bool>,
    pub search: Option<String>,
    /// Cursor: only gatherings with id < before
    pub before: Option<String>,
    pub limit: Option<i64>,
}

// ============================================================================
// Question Requests
// ============================================================================

/// Create question request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    /// Category ID (Snowflake as string)
    pub category_id: String,

    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Update question request
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: Option<String>,
}

/// Mark a question solved or unsolved
#[derive(Debug, Clone, Deserialize)]
pub struct SolveQuestionRequest {
    pub is_solved: bool,
}

/// Query parameters for question listings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct QuestionListQuery {
    pub category_id: Option<String>,
    pub is_solved: Option<bool>,
    pub search: Option<String>,
    /// "newest" (default) or "views"
    pub sort: Option<String>,
    pub before: Option<String>,
    pub limit: Option<i64>,
}

// ============================================================================
// Answer Requests
// ============================================================================

/// Create answer request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnswerRequest {
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

/// Update answer request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAnswerRequest {
    #[validate(length(min = 1, max = 10000, message = "Content must be 1-10000 characters"))]
    pub content: String,
}

// ============================================================================
// Chat Requests
// ============================================================================

/// Post a chat message over HTTP
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChatMessageRequest {
    #[validate(length(min = 1, max = 1000, message = "Message must be 1-1000 characters"))]
    pub content: String,
}

/// Cursor pagination for chat history
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MessageListQuery {
    pub before: Option<String>,
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            username: "a".to_string(),
            password: "short".to_string(),
            profile: None,
            education_level: None,
            location: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_create_gathering_capacity_bounds() {
        let req = CreateGatheringRequest {
            kind: "study".to_string(),
            category_id: "1".to_string(),
            title: "러스트 스터디".to_string(),
            description: "매주 일요일".to_string(),
            max_members: 1,
            recruitment_end: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
            end_date: None,
            meeting_schedule: None,
            study_type: "online".to_string(),
            location: None,
            target_level: "all".to_string(),
            has_cost: false,
            cost_description: None,
            required_skills: None,
            project_goal: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_verify_email_code_length() {
        let req = VerifyEmailRequest {
            email: "a@b.com".to_string(),
            code: "12345".to_string(),
        };
        assert!(req.validate().is_err());

        let req = VerifyEmailRequest {
            email: "a@b.com".to_string(),
            code: "123456".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
