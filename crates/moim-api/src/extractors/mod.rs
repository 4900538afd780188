//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and typed path IDs.

mod auth;
mod path;
mod validated;

pub use auth::{AuthUser, OptionalAuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use path::{
    AnswerIdPath, CategoryIdPath, GatheringIdPath, GatheringMemberPath, GatheringMessagePath,
    QuestionIdPath, UserIdPath,
};
pub use validated::{ApiQuery, ValidatedJson};
