//! Chat message handlers
//!
//! HTTP access to gathering chat: history, send, delete own message.
//! Live delivery happens over the WebSocket gateway.

use axum::extract::{Path, State};
use moim_service::{
    ChatMessageResponse, ChatService, CreateChatMessageRequest, MessageListQuery,
    PaginatedResponse,
};

use crate::extractors::{ApiQuery, AuthUser, GatheringIdPath, GatheringMessagePath, ValidatedJson};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Chat history, newest first (members only)
///
/// GET /gatherings/:gathering_id/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
    ApiQuery(params): ApiQuery<MessageListQuery>,
) -> ApiResult<ApiResponse<PaginatedResponse<ChatMessageResponse>>> {
    let gathering_id = path.gathering_id()?;
    let service = ChatService::new(state.service_context());
    let response = service.history(gathering_id, auth.user_id, params).await?;
    Ok(ApiResponse::ok("Messages", response))
}

/// Send a message over HTTP (members only)
///
/// POST /gatherings/:gathering_id/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringIdPath>,
    ValidatedJson(request): ValidatedJson<CreateChatMessageRequest>,
) -> ApiResult<ApiResponse<ChatMessageResponse>> {
    let gathering_id = path.gathering_id()?;
    let service = ChatService::new(state.service_context());
    let response = service
        .send_message(gathering_id, auth.user_id, request.content)
        .await?;
    Ok(ApiResponse::created("Message sent", response))
}

/// Delete one's own message
///
/// DELETE /gatherings/:gathering_id/messages/:message_id
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GatheringMessagePath>,
) -> ApiResult<ApiResponse<serde_json::Value>> {
    let gathering_id = path.gathering_id()?;
    let message_id = path.message_id()?;
    let service = ChatService::new(state.service_context());
    service
        .delete_message(gathering_id, message_id, auth.user_id)
        .await?;
    Ok(ApiResponse::message("Message deleted"))
}
