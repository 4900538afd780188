//! # moim-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `moim-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! Membership transitions (join, approve, leave, remove) run inside explicit
//! transactions that take `SELECT ... FOR UPDATE` on the gathering row, so
//! the seat check and the `current_members` counter stay consistent under
//! concurrent requests.

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use repositories::{
    PgAnswerRepository, PgCategoryRepository, PgChatMessageRepository, PgGatheringRepository,
    PgMemberRepository, PgQuestionRepository, PgUserRepository,
};
