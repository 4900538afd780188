//! Session storage module.
//!
//! Redis-backed storage for rotating refresh tokens.

mod refresh_token;

pub use refresh_token::{RefreshTokenData, RefreshTokenStore};
