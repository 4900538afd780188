//! Gathering service
//!
//! Creation, listing, editing, status transitions, and deletion of study and
//! project gatherings.

use chrono::Utc;
use moim_core::entities::{
    Gathering, GatheringKind, GatheringMember, GatheringStatus, StudyType, TargetLevel,
};
use moim_core::traits::GatheringQuery;
use moim_core::{MemberRole, MemberStatus, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    CreateGatheringRequest, GatheringDetailResponse, GatheringListQuery, GatheringResponse,
    GatheringStatsResponse, PaginatedResponse, UpdateGatheringRequest,
    UpdateGatheringStatusRequest,
};

use super::category::parse_id;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const DEFAULT_LIMIT: i64 = 20;

/// Gathering service
pub struct GatheringService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GatheringService<'a> {
    /// Create a new GatheringService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a gathering; the owner becomes the leader with a held seat
    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn create(
        &self,
        owner_id: Snowflake,
        request: CreateGatheringRequest,
    ) -> ServiceResult<GatheringResponse> {
        let kind = GatheringKind::parse(&request.kind)
            .ok_or_else(|| ServiceError::validation(format!("Unknown kind: {}", request.kind)))?;
        let study_type = StudyType::parse(&request.study_type).ok_or_else(|| {
            ServiceError::validation(format!("Unknown study type: {}", request.study_type))
        })?;
        let target_level = TargetLevel::parse(&request.target_level).ok_or_else(|| {
            ServiceError::validation(format!("Unknown target level: {}", request.target_level))
        })?;

        let category_id = parse_id(&request.category_id)?;
        self.ctx
            .category_repo()
            .find_by_id(category_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| ServiceError::not_found("Category", category_id.to_string()))?;

        if study_type.requires_location() && request.location.is_none() {
            return Err(ServiceError::Domain(
                moim_core::DomainError::LocationRequired,
            ));
        }

        if request.recruitment_end > request.start_date {
            return Err(ServiceError::validation(
                "Recruitment must close on or before the start date",
            ));
        }
        if let Some(end) = request.end_date {
            if end < request.start_date {
                return Err(ServiceError::validation("End date precedes start date"));
            }
        }

        let gathering_id = self.ctx.generate_id();
        let now = Utc::now();

        let gathering = Gathering {
            id: gathering_id,
            owner_id,
            category_id,
            kind,
            title: request.title,
            description: request.description,
            max_members: request.max_members,
            current_members: 1,
            recruitment_end: request.recruitment_end,
            start_date: request.start_date,
            end_date: request.end_date,
            meeting_schedule: request.meeting_schedule,
            study_type,
            location: request.location,
            target_level,
            has_cost: request.has_cost,
            cost_description: request.cost_description,
            status: GatheringStatus::Recruiting,
            required_skills: request.required_skills,
            project_goal: request.project_goal,
            created_at: now,
            updated_at: now,
        };

        let leader = GatheringMember::new_leader(self.ctx.generate_id(), gathering_id, owner_id);

        self.ctx
            .gathering_repo()
            .create_with_leader(&gathering, &leader)
            .await?;

        info!(gathering_id = %gathering_id, owner_id = %owner_id, "Gathering created");

        Ok(GatheringResponse::from(&gathering))
    }

    /// Gathering detail with member counts and the viewer's membership
    #[instrument(skip(self))]
    pub async fn get_detail(
        &self,
        gathering_id: Snowflake,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<GatheringDetailResponse> {
        let gathering = self.require_gathering(gathering_id).await?;
        let counts = self.ctx.member_repo().counts(gathering_id).await?;

        let my_status = match viewer {
            Some(user_id) if gathering.is_owner(user_id) => "owner".to_string(),
            Some(user_id) => {
                match self
                    .ctx
                    .member_repo()
                    .find_by_user(gathering_id, user_id)
                    .await?
                {
                    Some(m) if m.is_active => m.status.as_str().to_string(),
                    _ => "not_member".to_string(),
                }
            }
            None => "not_member".to_string(),
        };

        Ok(GatheringDetailResponse {
            gathering: GatheringResponse::from(&gathering),
            member_counts: counts.into(),
            my_status,
        })
    }

    /// Seat statistics and application counts by status
    #[instrument(skip(self))]
    pub async fn statistics(&self, gathering_id: Snowflake) -> ServiceResult<GatheringStatsResponse> {
        let gathering = self.require_gathering(gathering_id).await?;
        let counts = self.ctx.member_repo().counts(gathering_id).await?;

        Ok(GatheringStatsResponse::new(&gathering, counts))
    }

    /// List gatherings with filters and cursor pagination
    #[instrument(skip(self, params))]
    pub async fn list(
        &self,
        params: GatheringListQuery,
    ) -> ServiceResult<PaginatedResponse<GatheringResponse>> {
        let query = build_query(&params)?;
        let limit = query.limit;

        let gatherings = self.ctx.gathering_repo().find_all(&query).await?;

        let has_more = gatherings.len() as i64 >= limit;
        let next_cursor = if has_more {
            gatherings.last().map(|g| g.id.to_string())
        } else {
            None
        };

        Ok(PaginatedResponse::new(
            gatherings.iter().map(GatheringResponse::from).collect(),
            next_cursor,
            has_more,
            limit,
        ))
    }

    /// Gatherings where the user is an approved active member
    #[instrument(skip(self))]
    pub async fn my_gatherings(
        &self,
        user_id: Snowflake,
        role: Option<MemberRole>,
    ) -> ServiceResult<Vec<GatheringResponse>> {
        let gatherings = self
            .ctx
            .gathering_repo()
            .find_by_member(user_id, role)
            .await?;
        Ok(gatherings.iter().map(GatheringResponse::from).collect())
    }

    /// Update gathering fields (owner only)
    ///
    /// All fields are editable while recruiting; once in progress only the
    /// schedule, description, and end date may change.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
        request: UpdateGatheringRequest,
    ) -> ServiceResult<GatheringResponse> {
        let mut gathering = self.require_gathering(gathering_id).await?;
        require_owner(&gathering, user_id)?;

        if gathering.status == GatheringStatus::Finished {
            return Err(ServiceError::Domain(
                moim_core::DomainError::GatheringNotEditable,
            ));
        }

        let fully_editable = gathering.is_fully_editable();
        let restricted_change = request.category_id.is_some()
            || request.title.is_some()
            || request.max_members.is_some()
            || request.recruitment_end.is_some()
            || request.start_date.is_some()
            || request.study_type.is_some()
            || request.location.is_some()
            || request.target_level.is_some()
            || request.has_cost.is_some()
            || request.cost_description.is_some()
            || request.required_skills.is_some()
            || request.project_goal.is_some();
        if !fully_editable && restricted_change {
            return Err(ServiceError::Domain(
                moim_core::DomainError::GatheringNotEditable,
            ));
        }

        if let Some(category_id) = request.category_id.as_deref() {
            let category_id = parse_id(category_id)?;
            self.ctx
                .category_repo()
                .find_by_id(category_id)
                .await?
                .filter(|c| c.is_active)
                .ok_or_else(|| ServiceError::not_found("Category", category_id.to_string()))?;
            gathering.category_id = category_id;
        }
        if let Some(title) = request.title {
            gathering.title = title;
        }
        if let Some(description) = request.description {
            gathering.description = description;
        }
        if let Some(max_members) = request.max_members {
            // Cannot shrink below the seats already taken
            if max_members < gathering.current_members {
                return Err(ServiceError::validation(
                    "Capacity below current member count",
                ));
            }
            gathering.max_members = max_members;
        }
        if let Some(recruitment_end) = request.recruitment_end {
            gathering.recruitment_end = recruitment_end;
        }
        if let Some(start_date) = request.start_date {
            gathering.start_date = start_date;
        }
        if let Some(end_date) = request.end_date {
            gathering.end_date = Some(end_date);
        }
        if let Some(meeting_schedule) = request.meeting_schedule {
            gathering.meeting_schedule = Some(meeting_schedule);
        }
        if let Some(study_type) = request.study_type.as_deref() {
            gathering.study_type = StudyType::parse(study_type).ok_or_else(|| {
                ServiceError::validation(format!("Unknown study type: {study_type}"))
            })?;
        }
        if let Some(location) = request.location {
            gathering.location = Some(location);
        }
        if let Some(target_level) = request.target_level.as_deref() {
            gathering.target_level = TargetLevel::parse(target_level).ok_or_else(|| {
                ServiceError::validation(format!("Unknown target level: {target_level}"))
            })?;
        }
        if let Some(has_cost) = request.has_cost {
            gathering.has_cost = has_cost;
        }
        if let Some(cost_description) = request.cost_description {
            gathering.cost_description = Some(cost_description);
        }
        if let Some(required_skills) = request.required_skills {
            gathering.required_skills = Some(required_skills);
        }
        if let Some(project_goal) = request.project_goal {
            gathering.project_goal = Some(project_goal);
        }

        if gathering.study_type.requires_location() && gathering.location.is_none() {
            return Err(ServiceError::Domain(
                moim_core::DomainError::LocationRequired,
            ));
        }
        if gathering.recruitment_end > gathering.start_date {
            return Err(ServiceError::validation(
                "Recruitment must close on or before the start date",
            ));
        }

        gathering.updated_at = Utc::now();
        self.ctx.gathering_repo().update(&gathering).await?;

        info!(gathering_id = %gathering_id, "Gathering updated");

        Ok(GatheringResponse::from(&gathering))
    }

    /// Owner-driven status transition
    #[instrument(skip(self, request))]
    pub async fn update_status(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
        request: UpdateGatheringStatusRequest,
    ) -> ServiceResult<GatheringResponse> {
        let mut gathering = self.require_gathering(gathering_id).await?;
        require_owner(&gathering, user_id)?;

        let next = GatheringStatus::parse(&request.status).ok_or_else(|| {
            ServiceError::validation(format!("Unknown status: {}", request.status))
        })?;

        if !gathering.status.can_transition_to(next) {
            return Err(ServiceError::Domain(
                moim_core::DomainError::InvalidStatusTransition {
                    from: gathering.status,
                    to: next,
                },
            ));
        }

        self.ctx
            .gathering_repo()
            .update_status(gathering_id, next)
            .await?;
        gathering.status = next;
        gathering.updated_at = Utc::now();

        info!(gathering_id = %gathering_id, status = next.as_str(), "Status changed");

        Ok(GatheringResponse::from(&gathering))
    }

    /// Delete a gathering (owner only, leader must sit alone)
    #[instrument(skip(self))]
    pub async fn delete(&self, gathering_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let gathering = self.require_gathering(gathering_id).await?;
        require_owner(&gathering, user_id)?;

        if !gathering.can_delete() {
            if gathering.current_members > 1 {
                return Err(ServiceError::Domain(
                    moim_core::DomainError::GatheringHasMembers,
                ));
            }
            return Err(ServiceError::Domain(
                moim_core::DomainError::GatheringNotEditable,
            ));
        }

        // Pending requests alone do not block deletion; their rows go with it
        let pending = self
            .ctx
            .member_repo()
            .find_by_gathering(gathering_id, Some(MemberStatus::Pending), None, false)
            .await?;
        if !pending.is_empty() {
            info!(
                gathering_id = %gathering_id,
                pending = pending.len(),
                "Deleting gathering with pending requests"
            );
        }

        self.ctx.gathering_repo().delete(gathering_id).await?;

        info!(gathering_id = %gathering_id, "Gathering deleted");

        Ok(())
    }

    /// Flip recruiting gatherings past their deadline to recruitment_complete
    ///
    /// Called by the background sweep.
    #[instrument(skip(self))]
    pub async fn close_expired_recruitment(&self) -> ServiceResult<u64> {
        let today = Utc::now().date_naive();
        let closed = self
            .ctx
            .gathering_repo()
            .close_expired_recruitment(today)
            .await?;
        if closed > 0 {
            info!(closed = closed, "Closed expired recruitments");
        }
        Ok(closed)
    }

    pub(crate) async fn require_gathering(&self, id: Snowflake) -> ServiceResult<Gathering> {
        self.ctx
            .gathering_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Gathering", id.to_string()))
    }
}

fn require_owner(gathering: &Gathering, user_id: Snowflake) -> ServiceResult<()> {
    if gathering.is_owner(user_id) {
        Ok(())
    } else {
        Err(ServiceError::Domain(
            moim_core::DomainError::NotGatheringOwner,
        ))
    }
}

fn build_query(params: &GatheringListQuery) -> ServiceResult<GatheringQuery> {
    let kind = match params.kind.as_deref() {
        None => None,
        Some(s) => Some(
            GatheringKind::parse(s)
                .ok_or_else(|| ServiceError::validation(format!("Unknown kind: {s}")))?,
        ),
    };
    let status = match params.status.as_deref() {
        None => None,
        Some(s) => Some(
            GatheringStatus::parse(s)
                .ok_or_else(|| ServiceError::validation(format!("Unknown status: {s}")))?,
        ),
    };
    let study_type = match params.study_type.as_deref() {
        None => None,
        Some(s) => Some(
            StudyType::parse(s)
                .ok_or_else(|| ServiceError::validation(format!("Unknown study type: {s}")))?,
        ),
    };
    let target_level = match params.target_level.as_deref() {
        None => None,
        Some(s) => Some(
            TargetLevel::parse(s)
                .ok_or_else(|| ServiceError::validation(format!("Unknown target level: {s}")))?,
        ),
    };
    let category_id = super::category::parse_optional_id(params.category_id.as_deref())?;
    let before = super::category::parse_optional_id(params.before.as_deref())?;

    Ok(GatheringQuery {
        kind,
        category_id,
        status,
        study_type,
        target_level,
        is_recruiting: params.is_recruiting,
        search: params.search.clone(),
        before,
        limit: params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100),
    })
}
