//! Question entity <-> model mapper

use moim_core::entities::Question;
use moim_core::Snowflake;

use crate::models::QuestionModel;

impl From<QuestionModel> for Question {
    fn from(model: QuestionModel) -> Self {
        Question {
            id: Snowflake::new(model.id),
            user_id: Snowflake::new(model.user_id),
            category_id: Snowflake::new(model.category_id),
            title: model.title,
            content: model.content,
            view_count: model.view_count,
            is_solved: model.is_solved,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
