//! Category entity <-> model mapper

use moim_core::entities::Category;
use moim_core::Snowflake;

use crate::models::CategoryModel;

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Category {
            id: Snowflake::new(model.id),
            parent_id: model.parent_id.map(Snowflake::new),
            name: model.name,
            description: model.description,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
