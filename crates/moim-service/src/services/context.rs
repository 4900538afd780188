//! Service context - dependency container for services
//!
//! Holds all repositories, cache stores, and other dependencies needed by services.

use std::sync::Arc;

use moim_cache::{
    EmailVerificationStore, Publisher, RateLimiter, RefreshTokenStore, SharedRedisPool,
};
use moim_common::auth::JwtService;
use moim_common::RateLimitConfig;
use moim_core::traits::{
    AnswerRepository, CategoryRepository, ChatMessageRepository, GatheringRepository,
    MemberRepository, QuestionRepository, UserRepository,
};
use moim_core::SnowflakeGenerator;
use moim_db::PgPool;

use super::email::EmailSender;

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - Redis stores (refresh tokens, rate limits, email verification)
/// - JWT service for authentication
/// - Snowflake generator for ID generation
/// - Redis pub/sub for chat fan-out
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Redis pool
    redis_pool: SharedRedisPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    gathering_repo: Arc<dyn GatheringRepository>,
    member_repo: Arc<dyn MemberRepository>,
    chat_message_repo: Arc<dyn ChatMessageRepository>,
    question_repo: Arc<dyn QuestionRepository>,
    answer_repo: Arc<dyn AnswerRepository>,

    // Cache stores
    refresh_token_store: RefreshTokenStore,
    verification_store: EmailVerificationStore,
    rate_limiter: RateLimiter,

    // Pub/Sub
    publisher: Publisher,

    // Services
    jwt_service: Arc<JwtService>,
    email_sender: Arc<dyn EmailSender>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    // Rate limit windows
    rate_limit_config: RateLimitConfig,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        redis_pool: SharedRedisPool,
        user_repo: Arc<dyn UserRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        gathering_repo: Arc<dyn GatheringRepository>,
        member_repo: Arc<dyn MemberRepository>,
        chat_message_repo: Arc<dyn ChatMessageRepository>,
        question_repo: Arc<dyn QuestionRepository>,
        answer_repo: Arc<dyn AnswerRepository>,
        jwt_service: Arc<JwtService>,
        email_sender: Arc<dyn EmailSender>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        rate_limit_config: RateLimitConfig,
    ) -> Self {
        // Clone the inner RedisPool from the Arc
        let inner_pool = (*redis_pool).clone();
        let refresh_token_store = RefreshTokenStore::new(inner_pool.clone());
        let verification_store = EmailVerificationStore::new(inner_pool.clone());
        let rate_limiter = RateLimiter::new(inner_pool.clone());
        let publisher = Publisher::new(inner_pool);

        Self {
            pool,
            redis_pool,
            user_repo,
            category_repo,
            gathering_repo,
            member_repo,
            chat_message_repo,
            question_repo,
            answer_repo,
            refresh_token_store,
            verification_store,
            rate_limiter,
            publisher,
            jwt_service,
            email_sender,
            snowflake_generator,
            rate_limit_config,
        }
    }

    // === Pools ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the Redis connection pool
    pub fn redis_pool(&self) -> &SharedRedisPool {
        &self.redis_pool
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the category repository
    pub fn category_repo(&self) -> &dyn CategoryRepository {
        self.category_repo.as_ref()
    }

    /// Get the gathering repository
    pub fn gathering_repo(&self) -> &dyn GatheringRepository {
        self.gathering_repo.as_ref()
    }

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the chat message repository
    pub fn chat_message_repo(&self) -> &dyn ChatMessageRepository {
        self.chat_message_repo.as_ref()
    }

    /// Get the question repository
    pub fn question_repo(&self) -> &dyn QuestionRepository {
        self.question_repo.as_ref()
    }

    /// Get the answer repository
    pub fn answer_repo(&self) -> &dyn AnswerRepository {
        self.answer_repo.as_ref()
    }

    // === Cache Stores ===

    /// Get the refresh token store
    pub fn refresh_token_store(&self) -> &RefreshTokenStore {
        &self.refresh_token_store
    }

    /// Get the email verification store
    pub fn verification_store(&self) -> &EmailVerificationStore {
        &self.verification_store
    }

    /// Get the rate limiter
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    // === Pub/Sub ===

    /// Get the Redis pub/sub publisher
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the email sender
    pub fn email_sender(&self) -> &dyn EmailSender {
        self.email_sender.as_ref()
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Get the rate limit windows
    pub fn rate_limit_config(&self) -> &RateLimitConfig {
        &self.rate_limit_config
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> moim_core::Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("redis_pool", &"SharedRedisPool")
            .field("repositories", &"...")
            .field("cache_stores", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    category_repo: Option<Arc<dyn CategoryRepository>>,
    gathering_repo: Option<Arc<dyn GatheringRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    chat_message_repo: Option<Arc<dyn ChatMessageRepository>>,
    question_repo: Option<Arc<dyn QuestionRepository>>,
    answer_repo: Option<Arc<dyn AnswerRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    email_sender: Option<Arc<dyn EmailSender>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    rate_limit_config: Option<RateLimitConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            redis_pool: None,
            user_repo: None,
            category_repo: None,
            gathering_repo: None,
            member_repo: None,
            chat_message_repo: None,
            question_repo: None,
            answer_repo: None,
            jwt_service: None,
            email_sender: None,
            snowflake_generator: None,
            rate_limit_config: None,
        }
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn category_repo(mut self, repo: Arc<dyn CategoryRepository>) -> Self {
        self.category_repo = Some(repo);
        self
    }

    pub fn gathering_repo(mut self, repo: Arc<dyn GatheringRepository>) -> Self {
        self.gathering_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn chat_message_repo(mut self, repo: Arc<dyn ChatMessageRepository>) -> Self {
        self.chat_message_repo = Some(repo);
        self
    }

    pub fn question_repo(mut self, repo: Arc<dyn QuestionRepository>) -> Self {
        self.question_repo = Some(repo);
        self
    }

    pub fn answer_repo(mut self, repo: Arc<dyn AnswerRepository>) -> Self {
        self.answer_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn email_sender(mut self, sender: Arc<dyn EmailSender>) -> Self {
        self.email_sender = Some(sender);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit_config = Some(config);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        use super::error::ServiceError;
        Ok(ServiceContext::new(
            self.pool
                .ok_or_else(|| ServiceError::validation("pool is required"))?,
            self.redis_pool
                .ok_or_else(|| ServiceError::validation("redis_pool is required"))?,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.category_repo
                .ok_or_else(|| ServiceError::validation("category_repo is required"))?,
            self.gathering_repo
                .ok_or_else(|| ServiceError::validation("gathering_repo is required"))?,
            self.member_repo
                .ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            self.chat_message_repo
                .ok_or_else(|| ServiceError::validation("chat_message_repo is required"))?,
            self.question_repo
                .ok_or_else(|| ServiceError::validation("question_repo is required"))?,
            self.answer_repo
                .ok_or_else(|| ServiceError::validation("answer_repo is required"))?,
            self.jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            self.email_sender
                .ok_or_else(|| ServiceError::validation("email_sender is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.rate_limit_config
                .ok_or_else(|| ServiceError::validation("rate_limit_config is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
