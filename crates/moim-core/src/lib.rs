//! # moim-core
//!
//! Domain layer containing entities, value objects, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Answer, Category, ChatMessage, Gathering, GatheringKind, GatheringMember, GatheringStatus,
    JoinedType, MemberRole, MemberStatus, Question, StudyType, TargetLevel, User, UserRole,
};
pub use error::DomainError;
pub use traits::{
    AnswerRepository, CategoryRepository, ChatMessageRepository, GatheringQuery,
    GatheringRepository, MemberCounts, MemberRepository, MessageQuery, QuestionQuery,
    QuestionRepository, QuestionSort, RepoResult, UserRepository,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
