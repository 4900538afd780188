//! Error handling utilities for repositories

use moim_core::error::DomainError;
use moim_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "user not found" error
pub fn user_not_found(id: Snowflake) -> DomainError {
    DomainError::UserNotFound(id)
}

/// Create a "gathering not found" error
pub fn gathering_not_found(id: Snowflake) -> DomainError {
    DomainError::GatheringNotFound(id)
}

/// Create a "category not found" error
pub fn category_not_found(id: Snowflake) -> DomainError {
    DomainError::CategoryNotFound(id)
}

/// Create a "member not found" error
pub fn member_not_found() -> DomainError {
    DomainError::MemberNotFound
}

/// Create a "question not found" error
pub fn question_not_found(id: Snowflake) -> DomainError {
    DomainError::QuestionNotFound(id)
}

/// Create an "answer not found" error
pub fn answer_not_found(id: Snowflake) -> DomainError {
    DomainError::AnswerNotFound(id)
}

/// Create a "message not found" error
pub fn message_not_found(id: Snowflake) -> DomainError {
    DomainError::MessageNotFound(id)
}
