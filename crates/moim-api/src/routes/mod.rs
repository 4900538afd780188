//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::handlers::{
    answers, auth, categories, chat, gatherings, health, members, questions, users,
};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(category_routes())
        .merge(gathering_routes())
        .merge(question_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/email/request-code", post(auth::request_verification_code))
        .route("/auth/email/verify-code", post(auth::verify_code))
        .route("/auth/oauth/kakao", post(auth::kakao_login))
}

/// User routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(users::get_current_user))
        .route("/users/me", patch(users::update_current_user))
        .route("/users/me", delete(users::delete_account))
        .route("/users/me/password", post(users::change_password))
        .route("/users/me/gatherings", get(users::my_gatherings))
        .route("/users/:user_id", get(users::get_user))
}

/// Category routes
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list_categories))
        .route("/categories", post(categories::create_category))
        .route("/categories/:category_id", get(categories::get_category))
        .route("/categories/:category_id", patch(categories::update_category))
        .route("/categories/:category_id", delete(categories::delete_category))
}

/// Gathering routes including members and chat messages
fn gathering_routes() -> Router<AppState> {
    Router::new()
        // Gathering CRUD
        .route("/gatherings", get(gatherings::list_gatherings))
        .route("/gatherings", post(gatherings::create_gathering))
        .route("/gatherings/:gathering_id", get(gatherings::get_gathering))
        .route("/gatherings/:gathering_id", patch(gatherings::update_gathering))
        .route("/gatherings/:gathering_id", delete(gatherings::delete_gathering))
        .route("/gatherings/:gathering_id/status", post(gatherings::update_gathering_status))
        .route("/gatherings/:gathering_id/statistics", get(gatherings::gathering_statistics))
        // Membership lifecycle
        .route("/gatherings/:gathering_id/members", post(members::request_join))
        .route("/gatherings/:gathering_id/members", get(members::list_members))
        .route("/gatherings/:gathering_id/members/me", get(members::my_membership))
        .route("/gatherings/:gathering_id/members/me", delete(members::leave_gathering))
        .route("/gatherings/:gathering_id/members/me/cancel", post(members::cancel_request))
        .route(
            "/gatherings/:gathering_id/members/:member_id/approve",
            post(members::approve_member),
        )
        .route(
            "/gatherings/:gathering_id/members/:member_id/reject",
            post(members::reject_member),
        )
        .route(
            "/gatherings/:gathering_id/members/:member_id",
            delete(members::remove_member),
        )
        // Chat messages over HTTP
        .route("/gatherings/:gathering_id/messages", get(chat::get_messages))
        .route("/gatherings/:gathering_id/messages", post(chat::create_message))
        .route(
            "/gatherings/:gathering_id/messages/:message_id",
            delete(chat::delete_message),
        )
}

/// Question and answer routes
fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", get(questions::list_questions))
        .route("/questions", post(questions::create_question))
        .route("/questions/:question_id", get(questions::get_question))
        .route("/questions/:question_id", patch(questions::update_question))
        .route("/questions/:question_id", delete(questions::delete_question))
        .route("/questions/:question_id/solve", post(questions::solve_question))
        .route("/questions/:question_id/unsolve", post(questions::unsolve_question))
        .route("/questions/:question_id/answers", get(answers::list_answers))
        .route("/questions/:question_id/answers", post(answers::create_answer))
        .route("/answers/:answer_id", patch(answers::update_answer))
        .route("/answers/:answer_id", delete(answers::delete_answer))
}
