//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in moim-core.
//! Each repository handles database operations for a specific domain entity.

mod answer;
mod category;
mod chat_message;
mod error;
mod gathering;
mod member;
mod question;
mod user;

pub use answer::PgAnswerRepository;
pub use category::PgCategoryRepository;
pub use chat_message::PgChatMessageRepository;
pub use gathering::PgGatheringRepository;
pub use member::PgMemberRepository;
pub use question::PgQuestionRepository;
pub use user::PgUserRepository;
