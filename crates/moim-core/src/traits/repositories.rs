//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Membership transitions that must be safe
//! under concurrency (approve, leave, remove, join) are single guarded
//! methods so the implementation can hold a row lock on the gathering for
//! the whole seat check + counter update.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{
    Answer, Category, ChatMessage, Gathering, GatheringKind, GatheringMember, GatheringStatus,
    MemberRole, MemberStatus, Question, StudyType, TargetLevel, User,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by email (deleted accounts excluded)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Check if email is already taken
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Create a new user; `password_hash` is None for OAuth-only accounts
    async fn create(&self, user: &User, password_hash: Option<&str>) -> RepoResult<()>;

    /// Update an existing user (profile and login-failure fields included)
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Hard-delete soft-deleted users whose purge date has passed
    async fn purge_expired(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Category Repository
// ============================================================================

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find category by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Category>>;

    /// List categories, roots first then children by name
    async fn find_all(&self, active_only: bool) -> RepoResult<Vec<Category>>;

    /// Create a new category
    async fn create(&self, category: &Category) -> RepoResult<()>;

    /// Update an existing category
    async fn update(&self, category: &Category) -> RepoResult<()>;

    /// Delete a category
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Whether any gathering, question, or child category references it
    async fn is_referenced(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Gathering Repository
// ============================================================================

/// Filter and pagination options for gathering listings
#[derive(Debug, Clone, Default)]
pub struct GatheringQuery {
    pub kind: Option<GatheringKind>,
    pub category_id: Option<Snowflake>,
    pub status: Option<GatheringStatus>,
    pub study_type: Option<StudyType>,
    pub target_level: Option<TargetLevel>,
    pub is_recruiting: Option<bool>,
    /// Substring match over title and description
    pub search: Option<String>,
    /// Cursor: only gatherings with id < before
    pub before: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait GatheringRepository: Send + Sync {
    /// Find gathering by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Gathering>>;

    /// List gatherings matching the query, newest first
    async fn find_all(&self, query: &GatheringQuery) -> RepoResult<Vec<Gathering>>;

    /// List gatherings where the user is an approved active member
    async fn find_by_member(
        &self,
        user_id: Snowflake,
        role: Option<MemberRole>,
    ) -> RepoResult<Vec<Gathering>>;

    /// Insert the gathering and its leader member row in one transaction
    async fn create_with_leader(
        &self,
        gathering: &Gathering,
        leader: &GatheringMember,
    ) -> RepoResult<()>;

    /// Update an existing gathering
    async fn update(&self, gathering: &Gathering) -> RepoResult<()>;

    /// Delete a gathering and its member rows
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Set the status directly (owner-driven transition, already validated)
    async fn update_status(&self, id: Snowflake, status: GatheringStatus) -> RepoResult<()>;

    /// Flip recruiting gatherings past their deadline to recruitment_complete
    async fn close_expired_recruitment(&self, today: NaiveDate) -> RepoResult<u64>;
}

// ============================================================================
// Member Repository
// ============================================================================

/// Member counts per status for gathering statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member row by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GatheringMember>>;

    /// Find the row for a (gathering, user) pair, active or not
    async fn find_by_user(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<GatheringMember>>;

    /// List member rows, optionally filtered; inactive rows excluded unless asked
    async fn find_by_gathering(
        &self,
        gathering_id: Snowflake,
        status: Option<MemberStatus>,
        role: Option<MemberRole>,
        include_inactive: bool,
    ) -> RepoResult<Vec<GatheringMember>>;

    /// Join request: lock the gathering, verify it is recruiting with seats
    /// remaining and no active row exists for the pair, then insert `member`
    /// as pending.
    async fn request_join(&self, member: &GatheringMember) -> RepoResult<GatheringMember>;

    /// Approve a pending member: lock the gathering, re-check capacity,
    /// set the row approved, increment the counter, and flip the gathering
    /// to recruitment_complete when it fills. All in one transaction.
    async fn approve(&self, member_id: Snowflake) -> RepoResult<GatheringMember>;

    /// Reject a pending member. No counter change.
    async fn reject(&self, member_id: Snowflake) -> RepoResult<GatheringMember>;

    /// Cancel one's own pending request: the row is deleted
    async fn cancel(&self, gathering_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Leave: deactivate the approved row, decrement the counter under the
    /// gathering lock, and reopen recruitment when a seat frees up.
    async fn leave(&self, gathering_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Leader removal of a member: approved rows get leave semantics,
    /// pending rows are deleted.
    async fn remove(&self, member_id: Snowflake) -> RepoResult<()>;

    /// Member counts by status (active rows only)
    async fn counts(&self, gathering_id: Snowflake) -> RepoResult<MemberCounts>;
}

// ============================================================================
// Chat Message Repository
// ============================================================================

/// Pagination options for message queries
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub before: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<ChatMessage>>;

    /// List messages in a gathering, newest first
    async fn find_by_gathering(
        &self,
        gathering_id: Snowflake,
        query: &MessageQuery,
    ) -> RepoResult<Vec<ChatMessage>>;

    /// Persist a new message
    async fn create(&self, message: &ChatMessage) -> RepoResult<()>;

    /// Delete a message
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Question Repository
// ============================================================================

/// Sort order for question listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionSort {
    #[default]
    Newest,
    Views,
}

/// Filter and pagination options for question listings
#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
    pub category_id: Option<Snowflake>,
    pub is_solved: Option<bool>,
    pub search: Option<String>,
    pub sort: QuestionSort,
    pub before: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Find question by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Question>>;

    /// List questions matching the query
    async fn find_all(&self, query: &QuestionQuery) -> RepoResult<Vec<Question>>;

    /// Create a new question
    async fn create(&self, question: &Question) -> RepoResult<()>;

    /// Update title/content
    async fn update(&self, question: &Question) -> RepoResult<()>;

    /// Delete a question and its answers
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Atomically bump the view counter
    async fn increment_view_count(&self, id: Snowflake) -> RepoResult<()>;

    /// Toggle the solved flag
    async fn set_solved(&self, id: Snowflake, solved: bool) -> RepoResult<()>;

    /// Number of answers on the question
    async fn answer_count(&self, question_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Answer Repository
// ============================================================================

#[async_trait]
pub trait AnswerRepository: Send + Sync {
    /// Find answer by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Answer>>;

    /// List answers for a question, oldest first
    async fn find_by_question(&self, question_id: Snowflake) -> RepoResult<Vec<Answer>>;

    /// Create a new answer
    async fn create(&self, answer: &Answer) -> RepoResult<()>;

    /// Update answer content
    async fn update(&self, answer: &Answer) -> RepoResult<()>;

    /// Delete an answer
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}
