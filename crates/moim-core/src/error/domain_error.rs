//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::GatheringStatus;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Gathering not found: {0}")]
    GatheringNotFound(Snowflake),

    #[error("Category not found: {0}")]
    CategoryNotFound(Snowflake),

    #[error("Member not found in gathering")]
    MemberNotFound,

    #[error("Question not found: {0}")]
    QuestionNotFound(Snowflake),

    #[error("Answer not found: {0}")]
    AnswerNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        from: GatheringStatus,
        to: GatheringStatus,
    },

    #[error("Location is required for offline and mixed gatherings")]
    LocationRequired,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    #[error("Not gathering owner")]
    NotGatheringOwner,

    #[error("Not the author")]
    NotAuthor,

    #[error("Not a member of this gathering")]
    NotMember,

    #[error("Admin role required")]
    AdminRequired,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use")]
    EmailAlreadyExists,

    #[error("Already a member of this gathering")]
    AlreadyMember,

    #[error("Join request already pending")]
    AlreadyRequested,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Gathering is not recruiting")]
    NotRecruiting,

    #[error("Gathering has no remaining seats")]
    GatheringFull,

    #[error("Owner cannot join their own gathering")]
    CannotJoinOwnGathering,

    #[error("Leader cannot leave the gathering")]
    LeaderCannotLeave,

    #[error("Leader cannot be removed")]
    CannotRemoveLeader,

    #[error("Gathering still has members")]
    GatheringHasMembers,

    #[error("Gathering can no longer be edited")]
    GatheringNotEditable,

    #[error("Question already has answers")]
    QuestionHasAnswers,

    #[error("Category is still referenced")]
    CategoryInUse,

    #[error("Category tree is limited to one level")]
    CategoryTooDeep,

    #[error("Account is locked, try again later")]
    AccountLocked,

    #[error("Email address is not verified")]
    EmailNotVerified,

    #[error("Account has been deactivated")]
    AccountDeactivated,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::GatheringNotFound(_) => "UNKNOWN_GATHERING",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",
            Self::MemberNotFound => "UNKNOWN_MEMBER",
            Self::QuestionNotFound(_) => "UNKNOWN_QUESTION",
            Self::AnswerNotFound(_) => "UNKNOWN_ANSWER",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::LocationRequired => "LOCATION_REQUIRED",

            // Authorization
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",
            Self::NotGatheringOwner => "NOT_GATHERING_OWNER",
            Self::NotAuthor => "NOT_AUTHOR",
            Self::NotMember => "NOT_MEMBER",
            Self::AdminRequired => "ADMIN_REQUIRED",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::AlreadyRequested => "ALREADY_REQUESTED",

            // Business Rules
            Self::NotRecruiting => "NOT_RECRUITING",
            Self::GatheringFull => "GATHERING_FULL",
            Self::CannotJoinOwnGathering => "CANNOT_JOIN_OWN_GATHERING",
            Self::LeaderCannotLeave => "LEADER_CANNOT_LEAVE",
            Self::CannotRemoveLeader => "CANNOT_REMOVE_LEADER",
            Self::GatheringHasMembers => "GATHERING_HAS_MEMBERS",
            Self::GatheringNotEditable => "GATHERING_NOT_EDITABLE",
            Self::QuestionHasAnswers => "QUESTION_HAS_ANSWERS",
            Self::CategoryInUse => "CATEGORY_IN_USE",
            Self::CategoryTooDeep => "CATEGORY_TOO_DEEP",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            Self::AccountDeactivated => "ACCOUNT_DEACTIVATED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::GatheringNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::MemberNotFound
                | Self::QuestionNotFound(_)
                | Self::AnswerNotFound(_)
                | Self::MessageNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidEmail
                | Self::WeakPassword(_)
                | Self::ContentTooLong { .. }
                | Self::InvalidStatusTransition { .. }
                | Self::LocationRequired
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::MissingPermission(_)
                | Self::NotGatheringOwner
                | Self::NotAuthor
                | Self::NotMember
                | Self::AdminRequired
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::AlreadyMember | Self::AlreadyRequested
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::UserNotFound(Snowflake::new(1));
        assert_eq!(err.code(), "UNKNOWN_USER");

        let err = DomainError::GatheringFull;
        assert_eq!(err.code(), "GATHERING_FULL");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::GatheringNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::MemberNotFound.is_not_found());
        assert!(!DomainError::EmailAlreadyExists.is_not_found());
    }

    #[test]
    fn test_is_authorization() {
        assert!(DomainError::NotGatheringOwner.is_authorization());
        assert!(DomainError::NotAuthor.is_authorization());
        assert!(!DomainError::GatheringFull.is_authorization());
    }

    #[test]
    fn test_is_conflict() {
        assert!(DomainError::AlreadyMember.is_conflict());
        assert!(!DomainError::NotRecruiting.is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::UserNotFound(Snowflake::new(123));
        assert_eq!(err.to_string(), "User not found: 123");

        let err = DomainError::ContentTooLong { max: 1000 };
        assert_eq!(err.to_string(), "Content too long: max 1000 characters");
    }
}
