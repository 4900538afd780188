//! GatheringMember entity <-> model mapper

use moim_core::entities::{GatheringMember, MemberRole, MemberStatus};
use moim_core::{DomainError, Snowflake};

use super::bad_enum;
use crate::models::GatheringMemberModel;

impl TryFrom<GatheringMemberModel> for GatheringMember {
    type Error = DomainError;

    fn try_from(model: GatheringMemberModel) -> Result<Self, Self::Error> {
        let role = MemberRole::parse(&model.role).ok_or_else(|| bad_enum("role", &model.role))?;
        let status =
            MemberStatus::parse(&model.status).ok_or_else(|| bad_enum("status", &model.status))?;

        Ok(GatheringMember {
            id: Snowflake::new(model.id),
            gathering_id: Snowflake::new(model.gathering_id),
            user_id: Snowflake::new(model.user_id),
            role,
            status,
            is_active: model.is_active,
            joined_at: model.joined_at,
            updated_at: model.updated_at,
        })
    }
}
