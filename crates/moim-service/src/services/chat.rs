//! Chat service
//!
//! Persists gathering chat messages and fans them out over Redis pub/sub.
//! Entry is gated on membership; sending is rate limited per user.

use moim_cache::RateWindow;
use moim_core::entities::ChatMessage;
use moim_core::traits::MessageQuery;
use moim_core::Snowflake;
use tracing::{info, instrument, warn};

use crate::dto::{ChatMessageResponse, MessageListQuery, PaginatedResponse};

use super::category::parse_optional_id;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::member::MemberService;

const DEFAULT_LIMIT: i64 = 50;

/// Chat service
pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    /// Create a new ChatService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist a message and publish it to the gathering's channel
    #[instrument(skip(self, content))]
    pub async fn send_message(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
        content: String,
    ) -> ServiceResult<ChatMessageResponse> {
        self.require_membership(gathering_id, user_id).await?;

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(ServiceError::validation("Message is empty"));
        }
        if content.chars().count() > ChatMessage::MAX_LENGTH {
            return Err(ServiceError::Domain(
                moim_core::DomainError::ContentTooLong {
                    max: ChatMessage::MAX_LENGTH,
                },
            ));
        }

        let config = self.ctx.rate_limit_config();
        let window = RateWindow::chat(config.chat_per_window, config.chat_window_secs);
        let decision = self.ctx.rate_limiter().hit_user(&window, user_id).await?;
        if !decision.is_allowed() {
            warn!(user_id = %user_id, "Chat rate limited");
            return Err(ServiceError::App(
                moim_common::AppError::RateLimitExceeded,
            ));
        }

        let message = ChatMessage::new(self.ctx.generate_id(), gathering_id, user_id, content);
        self.ctx.chat_message_repo().create(&message).await?;

        let response = ChatMessageResponse::from(&message);

        // Fan out to every connected gateway instance
        let payload = serde_json::to_value(&response)
            .map_err(|e| ServiceError::internal(e.to_string()))?;
        self.ctx
            .publisher()
            .publish_chat_message(gathering_id, payload)
            .await?;

        info!(message_id = %message.id, gathering_id = %gathering_id, "Message sent");

        Ok(response)
    }

    /// Chat history, newest first (members only)
    #[instrument(skip(self, params))]
    pub async fn history(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
        params: MessageListQuery,
    ) -> ServiceResult<PaginatedResponse<ChatMessageResponse>> {
        self.require_membership(gathering_id, user_id).await?;

        let query = MessageQuery {
            before: parse_optional_id(params.before.as_deref())?,
            limit: params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100),
        };
        let limit = query.limit;

        let messages = self
            .ctx
            .chat_message_repo()
            .find_by_gathering(gathering_id, &query)
            .await?;

        let has_more = messages.len() as i64 >= limit;
        let next_cursor = if has_more {
            messages.last().map(|m| m.id.to_string())
        } else {
            None
        };

        Ok(PaginatedResponse::new(
            messages.iter().map(ChatMessageResponse::from).collect(),
            next_cursor,
            has_more,
            limit,
        ))
    }

    /// Delete one's own message
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        gathering_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        let message = self
            .ctx
            .chat_message_repo()
            .find_by_id(message_id)
            .await?
            .filter(|m| m.gathering_id == gathering_id)
            .ok_or_else(|| ServiceError::not_found("Message", message_id.to_string()))?;

        if !message.is_author(user_id) {
            return Err(ServiceError::Domain(moim_core::DomainError::NotAuthor));
        }

        self.ctx.chat_message_repo().delete(message_id).await?;

        info!(message_id = %message_id, gathering_id = %gathering_id, "Message deleted");

        Ok(())
    }

    /// Verify chat-room access for WebSocket upgrades
    #[instrument(skip(self))]
    pub async fn require_membership(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        let is_member = MemberService::new(self.ctx)
            .is_chat_member(gathering_id, user_id)
            .await?;
        if is_member {
            Ok(())
        } else {
            Err(ServiceError::Domain(moim_core::DomainError::NotMember))
        }
    }
}
