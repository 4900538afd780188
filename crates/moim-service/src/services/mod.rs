//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod answer;
pub mod auth;
pub mod category;
pub mod chat;
pub mod context;
pub mod email;
pub mod error;
pub mod gathering;
pub mod member;
pub mod oauth;
pub mod question;
pub mod user;

// Re-export all services for convenience
pub use answer::AnswerService;
pub use auth::AuthService;
pub use category::CategoryService;
pub use chat::ChatService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use email::{EmailSender, EmailService, LogEmailSender};
pub use error::{ServiceError, ServiceResult};
pub use gathering::GatheringService;
pub use member::MemberService;
pub use oauth::OAuthService;
pub use question::QuestionService;
pub use user::UserService;
