//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod answers;
pub mod auth;
pub mod categories;
pub mod chat;
pub mod gatherings;
pub mod health;
pub mod members;
pub mod questions;
pub mod users;
