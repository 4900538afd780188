//! Domain entities - core business objects

mod answer;
mod category;
mod chat_message;
mod gathering;
mod member;
mod question;
mod user;

pub use answer::Answer;
pub use category::Category;
pub use chat_message::ChatMessage;
pub use gathering::{Gathering, GatheringKind, GatheringStatus, StudyType, TargetLevel};
pub use member::{GatheringMember, MemberRole, MemberStatus};
pub use question::Question;
pub use user::{JoinedType, User, UserRole};
