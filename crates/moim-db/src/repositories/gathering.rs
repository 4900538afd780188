//! PostgreSQL implementation of GatheringRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use moim_core::entities::{Gathering, GatheringMember, GatheringStatus, MemberRole};
use moim_core::traits::{GatheringQuery, GatheringRepository, RepoResult};
use moim_core::value_objects::Snowflake;

use crate::models::GatheringModel;

use super::error::{gathering_not_found, map_db_error};

const GATHERING_COLUMNS: &str = "id, owner_id, category_id, kind, title, description, \
     max_members, current_members, recruitment_end, start_date, end_date, meeting_schedule, \
     study_type, location, target_level, has_cost, cost_description, status, \
     required_skills, project_goal, created_at, updated_at";

/// PostgreSQL implementation of GatheringRepository
#[derive(Clone)]
pub struct PgGatheringRepository {
    pool: PgPool,
}

impl PgGatheringRepository {
    /// Create a new PgGatheringRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GatheringRepository for PgGatheringRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Gathering>> {
        let result = sqlx::query_as::<_, GatheringModel>(&format!(
            "SELECT {GATHERING_COLUMNS} FROM gatherings WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Gathering::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self, query: &GatheringQuery) -> RepoResult<Vec<Gathering>> {
        let limit = query.limit.clamp(1, 100);

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {GATHERING_COLUMNS} FROM gatherings WHERE 1 = 1"
        ));

        if let Some(kind) = query.kind {
            builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(category_id) = query.category_id {
            builder
                .push(" AND category_id = ")
                .push_bind(category_id.into_inner());
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(study_type) = query.study_type {
            builder
                .push(" AND study_type = ")
                .push_bind(study_type.as_str());
        }
        if let Some(target_level) = query.target_level {
            builder
                .push(" AND target_level = ")
                .push_bind(target_level.as_str());
        }
        if let Some(is_recruiting) = query.is_recruiting {
            if is_recruiting {
                builder.push(" AND status = 'recruiting'");
            } else {
                builder.push(" AND status <> 'recruiting'");
            }
        }
        if let Some(search) = query.search.as_deref() {
            let pattern = format!("%{search}%");
            builder
                .push(" AND (title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(before) = query.before {
            builder.push(" AND id < ").push_bind(before.into_inner());
        }

        builder.push(" ORDER BY id DESC LIMIT ").push_bind(limit);

        let models = builder
            .build_query_as::<GatheringModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        models.into_iter().map(Gathering::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_member(
        &self,
        user_id: Snowflake,
        role: Option<MemberRole>,
    ) -> RepoResult<Vec<Gathering>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT g.{} FROM gatherings g \
             JOIN gathering_members m ON m.gathering_id = g.id \
             WHERE m.user_id = ",
            GATHERING_COLUMNS.replace(", ", ", g.")
        ));
        builder.push_bind(user_id.into_inner());
        builder.push(" AND m.status = 'approved' AND m.is_active = TRUE");

        if let Some(role) = role {
            builder.push(" AND m.role = ").push_bind(role.as_str());
        }
        builder.push(" ORDER BY g.id DESC");

        let models = builder
            .build_query_as::<GatheringModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        models.into_iter().map(Gathering::try_from).collect()
    }

    #[instrument(skip(self, gathering, leader))]
    async fn create_with_leader(
        &self,
        gathering: &Gathering,
        leader: &GatheringMember,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO gatherings (
                id, owner_id, category_id, kind, title, description,
                max_members, current_members, recruitment_end, start_date, end_date,
                meeting_schedule, study_type, location, target_level,
                has_cost, cost_description, status, required_skills, project_goal,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
            "#,
        )
        .bind(gathering.id.into_inner())
        .bind(gathering.owner_id.into_inner())
        .bind(gathering.category_id.into_inner())
        .bind(gathering.kind.as_str())
        .bind(&gathering.title)
        .bind(&gathering.description)
        .bind(gathering.max_members)
        .bind(gathering.current_members)
        .bind(gathering.recruitment_end)
        .bind(gathering.start_date)
        .bind(gathering.end_date)
        .bind(&gathering.meeting_schedule)
        .bind(gathering.study_type.as_str())
        .bind(&gathering.location)
        .bind(gathering.target_level.as_str())
        .bind(gathering.has_cost)
        .bind(&gathering.cost_description)
        .bind(gathering.status.as_str())
        .bind(&gathering.required_skills)
        .bind(&gathering.project_goal)
        .bind(gathering.created_at)
        .bind(gathering.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO gathering_members (
                id, gathering_id, user_id, role, status, is_active, joined_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(leader.id.into_inner())
        .bind(leader.gathering_id.into_inner())
        .bind(leader.user_id.into_inner())
        .bind(leader.role.as_str())
        .bind(leader.status.as_str())
        .bind(leader.is_active)
        .bind(leader.joined_at)
        .bind(leader.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, gathering))]
    async fn update(&self, gathering: &Gathering) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE gatherings
            SET category_id = $2, title = $3, description = $4, max_members = $5,
                recruitment_end = $6, start_date = $7, end_date = $8,
                meeting_schedule = $9, study_type = $10, location = $11,
                target_level = $12, has_cost = $13, cost_description = $14,
                required_skills = $15, project_goal = $16, updated_at = $17
            WHERE id = $1
            "#,
        )
        .bind(gathering.id.into_inner())
        .bind(gathering.category_id.into_inner())
        .bind(&gathering.title)
        .bind(&gathering.description)
        .bind(gathering.max_members)
        .bind(gathering.recruitment_end)
        .bind(gathering.start_date)
        .bind(gathering.end_date)
        .bind(&gathering.meeting_schedule)
        .bind(gathering.study_type.as_str())
        .bind(&gathering.location)
        .bind(gathering.target_level.as_str())
        .bind(gathering.has_cost)
        .bind(&gathering.cost_description)
        .bind(&gathering.required_skills)
        .bind(&gathering.project_goal)
        .bind(gathering.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(gathering_not_found(gathering.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM gathering_members WHERE gathering_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM gatherings WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(gathering_not_found(id));
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: Snowflake, status: GatheringStatus) -> RepoResult<()> {
        let result =
            sqlx::query("UPDATE gatherings SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id.into_inner())
                .bind(status.as_str())
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(gathering_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn close_expired_recruitment(&self, today: NaiveDate) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE gatherings
            SET status = 'recruitment_complete', updated_at = NOW()
            WHERE status = 'recruiting' AND recruitment_end < $1
            "#,
        )
        .bind(today)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
