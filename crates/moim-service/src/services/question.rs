//! Question service
//!
//! Community Q&A: questions with view counts and a solved flag.

use chrono::Utc;
use moim_core::entities::Question;
use moim_core::traits::{QuestionQuery, QuestionSort};
use moim_core::{Snowflake, UserRole};
use tracing::{info, instrument};

use crate::dto::{
    AnswerResponse, CreateQuestionRequest, PaginatedResponse, QuestionDetailResponse,
    QuestionListQuery, QuestionResponse, SolveQuestionRequest, UpdateQuestionRequest,
};

use super::category::{parse_id, parse_optional_id};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const DEFAULT_LIMIT: i64 = 20;

/// Question service
pub struct QuestionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QuestionService<'a> {
    /// Create a new QuestionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a question
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(
        &self,
        user_id: Snowflake,
        request: CreateQuestionRequest,
    ) -> ServiceResult<QuestionResponse> {
        let category_id = parse_id(&request.category_id)?;
        self.ctx
            .category_repo()
            .find_by_id(category_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| ServiceError::not_found("Category", category_id.to_string()))?;

        let question = Question::new(
            self.ctx.generate_id(),
            user_id,
            category_id,
            request.title,
            request.content,
        );

        self.ctx.question_repo().create(&question).await?;

        info!(question_id = %question.id, "Question created");

        Ok(QuestionResponse::from(&question))
    }

    /// Question detail with answers; each read bumps the view counter
    #[instrument(skip(self))]
    pub async fn get_detail(&self, question_id: Snowflake) -> ServiceResult<QuestionDetailResponse> {
        let mut question = self.require_question(question_id).await?;

        self.ctx
            .question_repo()
            .increment_view_count(question_id)
            .await?;
        question.view_count += 1;

        let answers = self
            .ctx
            .answer_repo()
            .find_by_question(question_id)
            .await?;

        Ok(QuestionDetailResponse {
            question: QuestionResponse::from(&question),
            answers: answers.iter().map(AnswerResponse::from).collect(),
        })
    }

    /// List questions with filters and cursor pagination
    #[instrument(skip(self, params))]
    pub async fn list(
        &self,
        params: QuestionListQuery,
    ) -> ServiceResult<PaginatedResponse<QuestionResponse>> {
        let sort = match params.sort.as_deref() {
            None | Some("newest") => QuestionSort::Newest,
            Some("views") => QuestionSort::Views,
            Some(other) => {
                return Err(ServiceError::validation(format!("Unknown sort: {other}")));
            }
        };

        let query = QuestionQuery {
            category_id: parse_optional_id(params.category_id.as_deref())?,
            is_solved: params.is_solved,
            search: params.search,
            sort,
            before: parse_optional_id(params.before.as_deref())?,
            limit: params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100),
        };
        let limit = query.limit;

        let questions = self.ctx.question_repo().find_all(&query).await?;

        let has_more = questions.len() as i64 >= limit;
        let next_cursor = if has_more {
            questions.last().map(|q| q.id.to_string())
        } else {
            None
        };

        Ok(PaginatedResponse::new(
            questions.iter().map(QuestionResponse::from).collect(),
            next_cursor,
            has_more,
            limit,
        ))
    }

    /// Update title/content (author only)
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        question_id: Snowflake,
        user_id: Snowflake,
        request: UpdateQuestionRequest,
    ) -> ServiceResult<QuestionResponse> {
        let mut question = self.require_question(question_id).await?;
        if !question.is_author(user_id) {
            return Err(ServiceError::Domain(moim_core::DomainError::NotAuthor));
        }

        if let Some(title) = request.title {
            question.title = title;
        }
        if let Some(content) = request.content {
            question.content = content;
        }
        question.updated_at = Utc::now();

        self.ctx.question_repo().update(&question).await?;

        info!(question_id = %question_id, "Question updated");

        Ok(QuestionResponse::from(&question))
    }

    /// Delete a question
    ///
    /// The author may delete only while unanswered; an admin always can.
    /// Answers go with the question.
    #[instrument(skip(self))]
    pub async fn delete(
        &self,
        question_id: Snowflake,
        user_id: Snowflake,
        caller_role: UserRole,
    ) -> ServiceResult<()> {
        let question = self.require_question(question_id).await?;

        if caller_role != UserRole::Admin {
            if !question.is_author(user_id) {
                return Err(ServiceError::Domain(moim_core::DomainError::NotAuthor));
            }
            let answers = self.ctx.question_repo().answer_count(question_id).await?;
            if answers > 0 {
                return Err(ServiceError::Domain(
                    moim_core::DomainError::QuestionHasAnswers,
                ));
            }
        }

        self.ctx.question_repo().delete(question_id).await?;

        info!(question_id = %question_id, "Question deleted");

        Ok(())
    }

    /// Mark a question solved or unsolved (author only)
    #[instrument(skip(self, request))]
    pub async fn set_solved(
        &self,
        question_id: Snowflake,
        user_id: Snowflake,
        request: SolveQuestionRequest,
    ) -> ServiceResult<QuestionResponse> {
        let mut question = self.require_question(question_id).await?;
        if !question.is_author(user_id) {
            return Err(ServiceError::Domain(moim_core::DomainError::NotAuthor));
        }

        self.ctx
            .question_repo()
            .set_solved(question_id, request.is_solved)
            .await?;
        question.set_solved(request.is_solved);

        info!(
            question_id = %question_id,
            is_solved = request.is_solved,
            "Question solved flag changed"
        );

        Ok(QuestionResponse::from(&question))
    }

    pub(crate) async fn require_question(&self, id: Snowflake) -> ServiceResult<Question> {
        self.ctx
            .question_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Question", id.to_string()))
    }
}
