//! Gathering entity <-> model mapper

use moim_core::entities::{Gathering, GatheringKind, GatheringStatus, StudyType, TargetLevel};
use moim_core::{DomainError, Snowflake};

use super::bad_enum;
use crate::models::GatheringModel;

impl TryFrom<GatheringModel> for Gathering {
    type Error = DomainError;

    fn try_from(model: GatheringModel) -> Result<Self, Self::Error> {
        let kind =
            GatheringKind::parse(&model.kind).ok_or_else(|| bad_enum("kind", &model.kind))?;
        let study_type = StudyType::parse(&model.study_type)
            .ok_or_else(|| bad_enum("study_type", &model.study_type))?;
        let target_level = TargetLevel::parse(&model.target_level)
            .ok_or_else(|| bad_enum("target_level", &model.target_level))?;
        let status = GatheringStatus::parse(&model.status)
            .ok_or_else(|| bad_enum("status", &model.status))?;

        Ok(Gathering {
            id: Snowflake::new(model.id),
            owner_id: Snowflake::new(model.owner_id),
            category_id: Snowflake::new(model.category_id),
            kind,
            title: model.title,
            description: model.description,
            max_members: model.max_members,
            current_members: model.current_members,
            recruitment_end: model.recruitment_end,
            start_date: model.start_date,
            end_date: model.end_date,
            meeting_schedule: model.meeting_schedule,
            study_type,
            location: model.location,
            target_level,
            has_cost: model.has_cost,
            cost_description: model.cost_description,
            status,
            required_skills: model.required_skills,
            project_goal: model.project_goal,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
