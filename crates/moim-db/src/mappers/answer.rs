//! Answer entity <-> model mapper

use moim_core::entities::Answer;
use moim_core::Snowflake;

use crate::models::AnswerModel;

impl From<AnswerModel> for Answer {
    fn from(model: AnswerModel) -> Self {
        Answer {
            id: Snowflake::new(model.id),
            question_id: Snowflake::new(model.question_id),
            user_id: Snowflake::new(model.user_id),
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
