//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs from path parameters.

use moim_core::Snowflake;

use crate::response::ApiError;

/// Path parameters with gathering_id
#[derive(Debug, serde::Deserialize)]
pub struct GatheringIdPath {
    pub gathering_id: String,
}

impl GatheringIdPath {
    /// Parse gathering_id as Snowflake
    pub fn gathering_id(&self) -> Result<Snowflake, ApiError> {
        self.gathering_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid gathering_id format"))
    }
}

/// Path parameters with gathering_id and member_id
#[derive(Debug, serde::Deserialize)]
pub struct GatheringMemberPath {
    pub gathering_id: String,
    pub member_id: String,
}

impl GatheringMemberPath {
    /// Parse gathering_id as Snowflake
    pub fn gathering_id(&self) -> Result<Snowflake, ApiError> {
        self.gathering_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid gathering_id format"))
    }

    /// Parse member_id as Snowflake
    pub fn member_id(&self) -> Result<Snowflake, ApiError> {
        self.member_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid member_id format"))
    }
}

/// Path parameters with gathering_id and message_id
#[derive(Debug, serde::Deserialize)]
pub struct GatheringMessagePath {
    pub gathering_id: String,
    pub message_id: String,
}

impl GatheringMessagePath {
    /// Parse gathering_id as Snowflake
    pub fn gathering_id(&self) -> Result<Snowflake, ApiError> {
        self.gathering_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid gathering_id format"))
    }

    /// Parse message_id as Snowflake
    pub fn message_id(&self) -> Result<Snowflake, ApiError> {
        self.message_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid message_id format"))
    }
}

/// Path parameters with category_id
#[derive(Debug, serde::Deserialize)]
pub struct CategoryIdPath {
    pub category_id: String,
}

impl CategoryIdPath {
    /// Parse category_id as Snowflake
    pub fn category_id(&self) -> Result<Snowflake, ApiError> {
        self.category_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid category_id format"))
    }
}

/// Path parameters with question_id
#[derive(Debug, serde::Deserialize)]
pub struct QuestionIdPath {
    pub question_id: String,
}

impl QuestionIdPath {
    /// Parse question_id as Snowflake
    pub fn question_id(&self) -> Result<Snowflake, ApiError> {
        self.question_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid question_id format"))
    }
}

/// Path parameters with answer_id
#[derive(Debug, serde::Deserialize)]
pub struct AnswerIdPath {
    pub answer_id: String,
}

impl AnswerIdPath {
    /// Parse answer_id as Snowflake
    pub fn answer_id(&self) -> Result<Snowflake, ApiError> {
        self.answer_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid answer_id format"))
    }
}

/// Path parameters with user_id
#[derive(Debug, serde::Deserialize)]
pub struct UserIdPath {
    pub user_id: String,
}

impl UserIdPath {
    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        self.user_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid user_id format"))
    }
}
