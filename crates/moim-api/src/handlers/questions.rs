//! Question handlers
//!
//! Community Q&A board.

use axum::extract::{Path, State};
use moim_service::{
    CreateQuestionRequest, PaginatedResponse, QuestionDetailResponse, QuestionListQuery,
    QuestionResponse, QuestionService, SolveQuestionRequest, UpdateQuestionRequest, UserService,
};

use crate::extractors::{ApiQuery, AuthUser, QuestionIdPath, ValidatedJson};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Post a question
///
/// POST /questions
pub async fn create_question(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateQuestionRequest>,
) -> ApiResult<ApiResponse<QuestionResponse>> {
    let service = QuestionService::new(state.service_context());
    let response = service.create(auth.user_id, request).await?;
    Ok(ApiResponse::created("Question created", response))
}

/// List questions with filters
///
/// GET /questions
pub async fn list_questions(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<QuestionListQuery>,
) -> ApiResult<ApiResponse<PaginatedResponse<QuestionResponse>>> {
    let service = QuestionService::new(state.service_context());
    let response = service.list(params).await?;
    Ok(ApiResponse::ok("Questions", response))
}

/// Question detail with answers; bumps the view counter
///
/// GET /questions/:question_id
pub async fn get_question(
    State(state): State<AppState>,
    Path(path): Path<QuestionIdPath>,
) -> ApiResult<ApiResponse<QuestionDetailResponse>> {
    let question_id = path.question_id()?;
    let service = QuestionService::new(state.service_context());
    let response = service.get_detail(question_id).await?;
    Ok(ApiResponse::ok("Question", response))
}

/// Edit a question (author only)
///
/// PATCH /questions/:question_id
pub async fn update_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<QuestionIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateQuestionRequest>,
) -> ApiResult<ApiResponse<QuestionResponse>> {
    let question_id = path.question_id()?;
    let service = QuestionService::new(state.service_context());
    let response = service.update(question_id, auth.user_id, request).await?;
    Ok(ApiResponse::ok("Question updated", response))
}

/// Delete a question (author while unanswered, or admin)
///
/// DELETE /questions/:question_id
pub async fn delete_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<QuestionIdPath>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let question_id = path.question_id()?;
    let role = UserService::new(state.service_context())
        .role_of(auth.user_id)
        .await?;
    let service = QuestionService::new(state.service_context());
    service.delete(question_id, auth.user_id, role).await?;
    Ok(ApiResponse::message("Question deleted"))
}

/// Mark a question solved (author only)
///
/// POST /questions/:question_id/solve
pub async fn solve_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<QuestionIdPath>,
) -> ApiResult<ApiResponse<QuestionResponse>> {
    let question_id = path.question_id()?;
    let service = QuestionService::new(state.service_context());
    let response = service
        .set_solved(question_id, auth.user_id, SolveQuestionRequest { is_solved: true })
        .await?;
    Ok(ApiResponse::ok("Question marked solved", response))
}

/// Mark a question unsolved (author only)
///
/// POST /questions/:question_id/unsolve
pub async fn unsolve_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<QuestionIdPath>,
) -> ApiResult<ApiResponse<QuestionResponse>> {
    let question_id = path.question_id()?;
    let service = QuestionService::new(state.service_context());
    let response = service
        .set_solved(question_id, auth.user_id, SolveQuestionRequest { is_solved: false })
        .await?;
    Ok(ApiResponse::ok("Question marked unsolved", response))
}
