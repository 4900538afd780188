//! Answer service

use moim_core::entities::Answer;
use moim_core::{Snowflake, UserRole};
use tracing::{info, instrument};

use crate::dto::{AnswerResponse, CreateAnswerRequest, UpdateAnswerRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::question::QuestionService;

/// Answer service
pub struct AnswerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AnswerService<'a> {
    /// Create a new AnswerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post an answer to a question
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        question_id: Snowflake,
        user_id: Snowflake,
        request: CreateAnswerRequest,
    ) -> ServiceResult<AnswerResponse> {
        QuestionService::new(self.ctx)
            .require_question(question_id)
            .await?;

        let answer = Answer::new(
            self.ctx.generate_id(),
            question_id,
            user_id,
            request.content,
        );

        self.ctx.answer_repo().create(&answer).await?;

        info!(answer_id = %answer.id, question_id = %question_id, "Answer created");

        Ok(AnswerResponse::from(&answer))
    }

    /// Answers for a question, oldest first
    #[instrument(skip(self))]
    pub async fn list_for_question(
        &self,
        question_id: Snowflake,
    ) -> ServiceResult<Vec<AnswerResponse>> {
        QuestionService::new(self.ctx)
            .require_question(question_id)
            .await?;

        let answers = self.ctx.answer_repo().find_by_question(question_id).await?;
        Ok(answers.iter().map(AnswerResponse::from).collect())
    }

    /// Edit an answer (author only)
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        answer_id: Snowflake,
        user_id: Snowflake,
        request: UpdateAnswerRequest,
    ) -> ServiceResult<AnswerResponse> {
        let mut answer = self.require_answer(answer_id).await?;
        if !answer.is_author(user_id) {
            return Err(ServiceError::Domain(moim_core::DomainError::NotAuthor));
        }

        answer.set_content(request.content);

        self.ctx.answer_repo().update(&answer).await?;

        info!(answer_id = %answer_id, "Answer updated");

        Ok(AnswerResponse::from(&answer))
    }

    /// Delete an answer (author or admin)
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        answer_id: Snowflake,
        user_id: Snowflake,
        caller_role: UserRole,
    ) -> ServiceResult<()> {
        let answer = self.require_answer(answer_id).await?;
        if caller_role != UserRole::Admin && !answer.is_author(user_id) {
            return Err(ServiceError::Domain(moim_core::DomainError::NotAuthor));
        }

        self.ctx.answer_repo().delete(answer_id).await?;

        info!(answer_id = %answer_id, "Answer deleted");

        Ok(())
    }

    async fn require_answer(&self, id: Snowflake) -> ServiceResult<Answer> {
        self.ctx
            .answer_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Answer", id.to_string()))
    }
}
