//! Database models - SQLx-compatible structs for PostgreSQL tables

mod answer;
mod category;
mod chat_message;
mod gathering;
mod member;
mod question;
mod user;

pub use answer::AnswerModel;
pub use category::CategoryModel;
pub use chat_message::ChatMessageModel;
pub use gathering::GatheringModel;
pub use member::{GatheringMemberModel, MemberCountsRow};
pub use question::QuestionModel;
pub use user::UserModel;
