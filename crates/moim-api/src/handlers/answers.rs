//! Answer handlers
//!
//! Answers hang off questions; edits are author only, deletion also admin.

use axum::extract::{Path, State};
use moim_service::{
    AnswerResponse, AnswerService, CreateAnswerRequest, UpdateAnswerRequest, UserService,
};

use crate::extractors::{AnswerIdPath, AuthUser, QuestionIdPath, ValidatedJson};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Post an answer to a question
///
/// POST /questions/:question_id/answers
pub async fn create_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<QuestionIdPath>,
    ValidatedJson(request): ValidatedJson<CreateAnswerRequest>,
) -> ApiResult<ApiResponse<AnswerResponse>> {
    let question_id = path.question_id()?;
    let service = AnswerService::new(state.service_context());
    let response = service.create(question_id, auth.user_id, request).await?;
    Ok(ApiResponse::created("Answer created", response))
}

/// List answers for a question
///
/// GET /questions/:question_id/answers
pub async fn list_answers(
    State(state): State<AppState>,
    Path(path): Path<QuestionIdPath>,
) -> ApiResult<ApiResponse<Vec<AnswerResponse>>> {
    let question_id = path.question_id()?;
    let service = AnswerService::new(state.service_context());
    let response = service.list_for_question(question_id).await?;
    Ok(ApiResponse::ok("Answers", response))
}

/// Edit an answer (author only)
///
/// PATCH /answers/:answer_id
pub async fn update_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<AnswerIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateAnswerRequest>,
) -> ApiResult<ApiResponse<AnswerResponse>> {
    let answer_id = path.answer_id()?;
    let service = AnswerService::new(state.service_context());
    let response = service.update(answer_id, auth.user_id, request).await?;
    Ok(ApiResponse::ok("Answer updated", response))
}

/// Delete an answer (author or admin)
///
/// DELETE /answers/:answer_id
pub async fn delete_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<AnswerIdPath>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let answer_id = path.answer_id()?;
    let role = UserService::new(state.service_context())
        .role_of(auth.user_id)
        .await?;
    let service = AnswerService::new(state.service_context());
    service.delete(answer_id, auth.user_id, role).await?;
    Ok(ApiResponse::message("Answer deleted"))
}
