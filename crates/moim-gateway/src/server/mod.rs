//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::chat_handler;
pub use state::GatewayState;

use crate::broadcast::ChannelSubscriptions;
use axum::{routing::get, Router};
use moim_cache::{RedisPool, RedisPoolConfig, SubscriberBuilder};
use moim_common::{AppConfig, AppError};
use moim_service::{LogEmailSender, ServiceContextBuilder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws/chat/:gathering_id", get(chat_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = moim_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = moim_db::create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    tracing::info!("Connecting to Redis...");
    let redis_config = RedisPoolConfig::from(&config.redis);
    let redis_pool = RedisPool::new(redis_config).map_err(|e| AppError::Cache(e.to_string()))?;
    let shared_redis = Arc::new(redis_pool);
    tracing::info!("Redis connection established");

    let jwt_service = Arc::new(moim_common::JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let snowflake_generator = Arc::new(moim_core::SnowflakeGenerator::new(
        config.snowflake.worker_id,
    ));

    let user_repo = Arc::new(moim_db::PgUserRepository::new(pool.clone()));
    let category_repo = Arc::new(moim_db::PgCategoryRepository::new(pool.clone()));
    let gathering_repo = Arc::new(moim_db::PgGatheringRepository::new(pool.clone()));
    let member_repo = Arc::new(moim_db::PgMemberRepository::new(pool.clone()));
    let chat_message_repo = Arc::new(moim_db::PgChatMessageRepository::new(pool.clone()));
    let question_repo = Arc::new(moim_db::PgQuestionRepository::new(pool.clone()));
    let answer_repo = Arc::new(moim_db::PgAnswerRepository::new(pool.clone()));

    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .redis_pool(shared_redis)
        .user_repo(user_repo)
        .category_repo(category_repo)
        .gathering_repo(gathering_repo)
        .member_repo(member_repo)
        .chat_message_repo(chat_message_repo)
        .question_repo(question_repo)
        .answer_repo(answer_repo)
        .jwt_service(jwt_service)
        .email_sender(Arc::new(LogEmailSender))
        .snowflake_generator(snowflake_generator)
        .rate_limit_config(config.rate_limit.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    // One pub/sub connection shared by every socket on this instance
    let subscriber = SubscriberBuilder::new()
        .redis_url(config.redis.url.clone())
        .build()
        .await
        .map_err(|e| AppError::Cache(format!("Failed to create subscriber: {e}")))?;
    let subscriptions = Arc::new(ChannelSubscriptions::new(Arc::new(subscriber)));

    Ok(GatewayState::new(service_context, subscriptions, config))
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/ws/chat", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.gateway.port));

    let state = create_gateway_state(config).await?;

    let app = create_app(state);

    run_server(app, addr).await
}
