//! Membership service
//!
//! The join lifecycle: request, approve, reject, cancel, leave, remove.
//! Seat accounting happens inside the repository under a gathering row lock;
//! this layer enforces who may trigger each transition.

use moim_core::entities::GatheringMember;
use moim_core::{MemberRole, MemberStatus, Snowflake};
use tracing::{info, instrument};

use crate::dto::{MemberResponse, MyMembershipResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::gathering::GatheringService;

/// Membership service
pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Request to join a gathering
    #[instrument(skip(self))]
    pub async fn request_join(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<MemberResponse> {
        let gathering = GatheringService::new(self.ctx)
            .require_gathering(gathering_id)
            .await?;

        if gathering.is_owner(user_id) {
            return Err(ServiceError::Domain(
                moim_core::DomainError::CannotJoinOwnGathering,
            ));
        }

        // Recruiting and capacity are re-checked under the row lock
        let member = GatheringMember::new_pending(self.ctx.generate_id(), gathering_id, user_id);
        let member = self.ctx.member_repo().request_join(&member).await?;

        info!(gathering_id = %gathering_id, user_id = %user_id, "Join requested");

        self.to_response(&member).await
    }

    /// Approve a pending request (owner only)
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        gathering_id: Snowflake,
        member_id: Snowflake,
        caller_id: Snowflake,
    ) -> ServiceResult<MemberResponse> {
        self.require_owner(gathering_id, caller_id).await?;
        self.require_member_of(member_id, gathering_id).await?;

        let member = self.ctx.member_repo().approve(member_id).await?;

        info!(gathering_id = %gathering_id, member_id = %member_id, "Member approved");

        self.to_response(&member).await
    }

    /// Reject a pending request (owner only)
    #[instrument(skip(self))]
    pub async fn reject(
        &self,
        gathering_id: Snowflake,
        member_id: Snowflake,
        caller_id: Snowflake,
    ) -> ServiceResult<MemberResponse> {
        self.require_owner(gathering_id, caller_id).await?;
        self.require_member_of(member_id, gathering_id).await?;

        let member = self.ctx.member_repo().reject(member_id).await?;

        info!(gathering_id = %gathering_id, member_id = %member_id, "Member rejected");

        self.to_response(&member).await
    }

    /// Cancel one's own pending request
    #[instrument(skip(self))]
    pub async fn cancel(&self, gathering_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        self.ctx.member_repo().cancel(gathering_id, user_id).await?;

        info!(gathering_id = %gathering_id, user_id = %user_id, "Join request cancelled");

        Ok(())
    }

    /// Leave a gathering as an approved member
    #[instrument(skip(self))]
    pub async fn leave(&self, gathering_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        self.ctx.member_repo().leave(gathering_id, user_id).await?;

        info!(gathering_id = %gathering_id, user_id = %user_id, "Member left");

        Ok(())
    }

    /// Remove a member (owner only)
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        gathering_id: Snowflake,
        member_id: Snowflake,
        caller_id: Snowflake,
    ) -> ServiceResult<()> {
        self.require_owner(gathering_id, caller_id).await?;
        self.require_member_of(member_id, gathering_id).await?;

        self.ctx.member_repo().remove(member_id).await?;

        info!(gathering_id = %gathering_id, member_id = %member_id, "Member removed");

        Ok(())
    }

    /// List members of a gathering
    ///
    /// The owner sees every status; other callers only the approved roster.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        gathering_id: Snowflake,
        caller_id: Snowflake,
        status: Option<MemberStatus>,
    ) -> ServiceResult<Vec<MemberResponse>> {
        let gathering = GatheringService::new(self.ctx)
            .require_gathering(gathering_id)
            .await?;

        let status = if gathering.is_owner(caller_id) {
            status
        } else {
            Some(MemberStatus::Approved)
        };

        let members = self
            .ctx
            .member_repo()
            .find_by_gathering(gathering_id, status, None, false)
            .await?;

        let mut responses = Vec::with_capacity(members.len());
        for member in &members {
            responses.push(self.to_response(member).await?);
        }
        Ok(responses)
    }

    /// The caller's own standing in a gathering
    #[instrument(skip(self))]
    pub async fn my_membership(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<MyMembershipResponse> {
        let gathering = GatheringService::new(self.ctx)
            .require_gathering(gathering_id)
            .await?;

        if gathering.is_owner(user_id) {
            return Ok(MyMembershipResponse {
                status: "owner".to_string(),
                member: None,
            });
        }

        let member = self
            .ctx
            .member_repo()
            .find_by_user(gathering_id, user_id)
            .await?
            .filter(|m| m.is_active);

        match member {
            Some(member) => Ok(MyMembershipResponse {
                status: member.status.as_str().to_string(),
                member: Some(self.to_response(&member).await?),
            }),
            None => Ok(MyMembershipResponse {
                status: "not_member".to_string(),
                member: None,
            }),
        }
    }

    /// Whether the user may enter the gathering's chat room
    ///
    /// The leader and approved active members qualify.
    #[instrument(skip(self))]
    pub async fn is_chat_member(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<bool> {
        let member = self
            .ctx
            .member_repo()
            .find_by_user(gathering_id, user_id)
            .await?;

        Ok(member.is_some_and(|m| {
            m.is_active && (m.role == MemberRole::Leader || m.is_approved_active())
        }))
    }

    async fn require_owner(
        &self,
        gathering_id: Snowflake,
        caller_id: Snowflake,
    ) -> ServiceResult<()> {
        let gathering = GatheringService::new(self.ctx)
            .require_gathering(gathering_id)
            .await?;
        if gathering.is_owner(caller_id) {
            Ok(())
        } else {
            Err(ServiceError::Domain(
                moim_core::DomainError::NotGatheringOwner,
            ))
        }
    }

    /// Guard against member IDs from another gathering in the path
    async fn require_member_of(
        &self,
        member_id: Snowflake,
        gathering_id: Snowflake,
    ) -> ServiceResult<()> {
        let member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Member", member_id.to_string()))?;

        if member.gathering_id == gathering_id {
            Ok(())
        } else {
            Err(ServiceError::not_found("Member", member_id.to_string()))
        }
    }

    async fn to_response(&self, member: &GatheringMember) -> ServiceResult<MemberResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(member.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", member.user_id.to_string()))?;

        Ok(MemberResponse::new(member, &user))
    }
}
