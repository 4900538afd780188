//! PostgreSQL implementation of MemberRepository
//!
//! The state transitions here (join, approve, leave, remove) are the only
//! writers of `gatherings.current_members`. Each one locks the gathering
//! row with `SELECT ... FOR UPDATE` before checking seats or touching the
//! counter, so two concurrent approvals of the last seat cannot both win.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::instrument;

use moim_core::entities::{GatheringMember, MemberRole, MemberStatus};
use moim_core::error::DomainError;
use moim_core::traits::{MemberCounts, MemberRepository, RepoResult};
use moim_core::value_objects::Snowflake;

use crate::models::{GatheringMemberModel, MemberCountsRow};

use super::error::{map_db_error, member_not_found};

const MEMBER_COLUMNS: &str =
    "id, gathering_id, user_id, role, status, is_active, joined_at, updated_at";

/// Gathering fields needed by the guarded transitions
#[derive(Debug, sqlx::FromRow)]
struct LockedGathering {
    status: String,
    max_members: i32,
    current_members: i32,
}

/// PostgreSQL implementation of MemberRepository
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock the gathering row for the duration of the transaction
    async fn lock_gathering(
        tx: &mut Transaction<'_, Postgres>,
        gathering_id: i64,
    ) -> RepoResult<LockedGathering> {
        sqlx::query_as::<_, LockedGathering>(
            "SELECT status, max_members, current_members FROM gatherings WHERE id = $1 FOR UPDATE",
        )
        .bind(gathering_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::GatheringNotFound(Snowflake::new(gathering_id)))
    }

    async fn fetch_member_row(
        tx: &mut Transaction<'_, Postgres>,
        member_id: i64,
    ) -> RepoResult<GatheringMemberModel> {
        sqlx::query_as::<_, GatheringMemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM gathering_members WHERE id = $1"
        ))
        .bind(member_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(member_not_found)
    }

    /// Deactivate an approved row and give the seat back, inside `tx`
    async fn release_seat(
        tx: &mut Transaction<'_, Postgres>,
        gathering_id: i64,
        member_id: i64,
        locked: &LockedGathering,
    ) -> RepoResult<()> {
        sqlx::query(
            "UPDATE gathering_members SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(member_id)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        let new_count = (locked.current_members - 1).max(1);
        let new_status = if locked.status == "recruitment_complete" && new_count < locked.max_members
        {
            "recruiting"
        } else {
            locked.status.as_str()
        };

        sqlx::query(
            "UPDATE gatherings SET current_members = $2, status = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(gathering_id)
        .bind(new_count)
        .bind(new_status)
        .execute(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<GatheringMember>> {
        let result = sqlx::query_as::<_, GatheringMemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM gathering_members WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(GatheringMember::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_user(
        &self,
        gathering_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<GatheringMember>> {
        let result = sqlx::query_as::<_, GatheringMemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM gathering_members \
             WHERE gathering_id = $1 AND user_id = $2"
        ))
        .bind(gathering_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(GatheringMember::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_gathering(
        &self,
        gathering_id: Snowflake,
        status: Option<MemberStatus>,
        role: Option<MemberRole>,
        include_inactive: bool,
    ) -> RepoResult<Vec<GatheringMember>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {MEMBER_COLUMNS} FROM gathering_members WHERE gathering_id = "
        ));
        builder.push_bind(gathering_id.into_inner());

        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(role) = role {
            builder.push(" AND role = ").push_bind(role.as_str());
        }
        if !include_inactive {
            builder.push(" AND is_active = TRUE");
        }
        builder.push(" ORDER BY joined_at");

        let models = builder
            .build_query_as::<GatheringMemberModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        models.into_iter().map(GatheringMember::try_from).collect()
    }

    #[instrument(skip(self, member))]
    async fn request_join(&self, member: &GatheringMember) -> RepoResult<GatheringMember> {
        let gathering_id = member.gathering_id.into_inner();
        let user_id = member.user_id.into_inner();

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let locked = Self::lock_gathering(&mut tx, gathering_id).await?;
        if locked.status != "recruiting" {
            return Err(DomainError::NotRecruiting);
        }
        if locked.current_members >= locked.max_members {
            return Err(DomainError::GatheringFull);
        }

        let existing = sqlx::query_as::<_, GatheringMemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM gathering_members \
             WHERE gathering_id = $1 AND user_id = $2"
        ))
        .bind(gathering_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let row = match existing {
            Some(row) if row.is_active && row.status == "pending" => {
                return Err(DomainError::AlreadyRequested);
            }
            Some(row) if row.is_active && row.status == "approved" => {
                return Err(DomainError::AlreadyMember);
            }
            // Rejected or inactive rows are recycled back to pending; the
            // unique (gathering_id, user_id) index forbids a second insert.
            Some(row) => sqlx::query_as::<_, GatheringMemberModel>(&format!(
                "UPDATE gathering_members \
                 SET role = 'participant', status = 'pending', is_active = TRUE, \
                     joined_at = NOW(), updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING {MEMBER_COLUMNS}"
            ))
            .bind(row.id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?,
            None => sqlx::query_as::<_, GatheringMemberModel>(&format!(
                "INSERT INTO gathering_members \
                     (id, gathering_id, user_id, role, status, is_active, joined_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 RETURNING {MEMBER_COLUMNS}"
            ))
            .bind(member.id.into_inner())
            .bind(gathering_id)
            .bind(user_id)
            .bind(member.role.as_str())
            .bind(member.status.as_str())
            .bind(member.is_active)
            .bind(member.joined_at)
            .bind(member.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?,
        };

        tx.commit().await.map_err(map_db_error)?;
        GatheringMember::try_from(row)
    }

    #[instrument(skip(self))]
    async fn approve(&self, member_id: Snowflake) -> RepoResult<GatheringMember> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Find the gathering first, then take its lock before re-reading
        // the member row, so every transition locks in the same order.
        let row = Self::fetch_member_row(&mut tx, member_id.into_inner()).await?;
        let locked = Self::lock_gathering(&mut tx, row.gathering_id).await?;

        let row = Self::fetch_member_row(&mut tx, member_id.into_inner()).await?;
        if !row.is_active || row.status != "pending" {
            return Err(DomainError::ValidationError(
                "only pending requests can be approved".to_string(),
            ));
        }
        if locked.current_members >= locked.max_members {
            return Err(DomainError::GatheringFull);
        }

        let updated = sqlx::query_as::<_, GatheringMemberModel>(&format!(
            "UPDATE gathering_members SET status = 'approved', updated_at = NOW() \
             WHERE id = $1 RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(member_id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let new_count = locked.current_members + 1;
        let new_status = if new_count >= locked.max_members && locked.status == "recruiting" {
            "recruitment_complete"
        } else {
            locked.status.as_str()
        };

        sqlx::query(
            "UPDATE gatherings SET current_members = $2, status = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(row.gathering_id)
        .bind(new_count)
        .bind(new_status)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        GatheringMember::try_from(updated)
    }

    #[instrument(skip(self))]
    async fn reject(&self, member_id: Snowflake) -> RepoResult<GatheringMember> {
        let row = sqlx::query_as::<_, GatheringMemberModel>(&format!(
            "UPDATE gathering_members SET status = 'rejected', updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' AND is_active = TRUE \
             RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(member_not_found)?;

        GatheringMember::try_from(row)
    }

    #[instrument(skip(self))]
    async fn cancel(&self, gathering_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            "DELETE FROM gathering_members \
             WHERE gathering_id = $1 AND user_id = $2 AND status = 'pending' AND is_active = TRUE",
        )
        .bind(gathering_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(member_not_found());
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn leave(&self, gathering_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let locked = Self::lock_gathering(&mut tx, gathering_id.into_inner()).await?;

        let row = sqlx::query_as::<_, GatheringMemberModel>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM gathering_members \
             WHERE gathering_id = $1 AND user_id = $2"
        ))
        .bind(gathering_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(member_not_found)?;

        if row.role == "leader" {
            return Err(DomainError::LeaderCannotLeave);
        }
        if !row.is_active || row.status != "approved" {
            return Err(member_not_found());
        }

        Self::release_seat(&mut tx, gathering_id.into_inner(), row.id, &locked).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, member_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let row = Self::fetch_member_row(&mut tx, member_id.into_inner()).await?;
        if row.role == "leader" {
            return Err(DomainError::CannotRemoveLeader);
        }

        let locked = Self::lock_gathering(&mut tx, row.gathering_id).await?;
        let row = Self::fetch_member_row(&mut tx, member_id.into_inner()).await?;

        if row.status == "pending" && row.is_active {
            // Pending removal drops the request entirely, no seat involved
            sqlx::query("DELETE FROM gathering_members WHERE id = $1")
                .bind(row.id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        } else if row.status == "approved" && row.is_active {
            Self::release_seat(&mut tx, row.gathering_id, row.id, &locked).await?;
        } else {
            return Err(member_not_found());
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn counts(&self, gathering_id: Snowflake) -> RepoResult<MemberCounts> {
        let row = sqlx::query_as::<_, MemberCountsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
            FROM gathering_members
            WHERE gathering_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(gathering_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(MemberCounts {
            pending: row.pending,
            approved: row.approved,
            rejected: row.rejected,
        })
    }
}
