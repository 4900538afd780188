//! Server setup and initialization
//!
//! Provides the main application builder, dependency wiring, and the
//! background sweep tasks.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use moim_cache::{RedisPool, RedisPoolConfig};
use moim_common::{AppConfig, AppError, JwtService};
use moim_core::SnowflakeGenerator;
use moim_db::{
    create_pool, PgAnswerRepository, PgCategoryRepository, PgChatMessageRepository,
    PgGatheringRepository, PgMemberRepository, PgQuestionRepository, PgUserRepository,
};
use moim_service::{
    GatheringService, LogEmailSender, ServiceContext, ServiceContextBuilder, UserService,
};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// How often the background sweeps run
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api_router = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    // Health endpoints skip the global throttle
    let health_router = apply_middleware(health_routes());

    api_router.merge(health_router).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = moim_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    info!("Connecting to Redis...");
    let redis_config = RedisPoolConfig::from(&config.redis);
    let redis_pool = RedisPool::new(redis_config).map_err(|e| AppError::Cache(e.to_string()))?;
    let shared_redis = Arc::new(redis_pool);
    info!("Redis connection established");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
        config.jwt.refresh_token_expiry,
    ));

    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let category_repo = Arc::new(PgCategoryRepository::new(pool.clone()));
    let gathering_repo = Arc::new(PgGatheringRepository::new(pool.clone()));
    let member_repo = Arc::new(PgMemberRepository::new(pool.clone()));
    let chat_message_repo = Arc::new(PgChatMessageRepository::new(pool.clone()));
    let question_repo = Arc::new(PgQuestionRepository::new(pool.clone()));
    let answer_repo = Arc::new(PgAnswerRepository::new(pool.clone()));

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

    Ok(AppState::new(service_context, config))
}

/// Periodic maintenance: close overdue recruitments and purge expired accounts
pub fn spawn_sweep_tasks(ctx: Arc<ServiceContext>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;

            if let Err(e) = GatheringService::new(&ctx).close_expired_recruitment().await {
                error!(error = %e, "Recruitment deadline sweep failed");
            }
            if let Err(e) = UserService::new(&ctx).purge_expired_accounts().await {
                error!(error = %e, "Account purge sweep failed");
            }
        }
    });
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    let state = create_app_state(config).await?;

    spawn_sweep_tasks(state.shared_service_context());

    let app = create_app(state);

    run_server(app, addr).await
}
