//! # moim-cache
//!
//! Redis layer for rate limiting, refresh tokens, email verification, and pub/sub.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Refresh Tokens**: Rotating refresh-token storage with automatic expiry
//! - **Rate Limiting**: Fixed-window counters for login, email, and chat
//! - **Email Verification**: Short-lived verification codes and verified flags
//! - **Pub/Sub**: Chat message fan-out across server instances

pub mod pool;
pub mod pubsub;
pub mod rate_limit;
pub mod session;
pub mod verification;

pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

pub use session::{RefreshTokenData, RefreshTokenStore};

pub use rate_limit::{RateLimitDecision, RateLimiter, RateWindow};

pub use verification::{EmailVerificationStore, VerificationOutcome};

pub use pubsub::{
    ChatEvent, PubSubChannel, Publisher, ReceivedMessage, Subscriber, SubscriberBuilder,
    SubscriberConfig, SubscriberError, SubscriberResult, CHAT_CHANNEL_PREFIX,
};
