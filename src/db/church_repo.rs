// src/db/church_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::ChurchStore,
    models::{
        church::{
            Church, ChurchPlan, ChurchStats, NewChurch, Onboarding, PlanTier, StatsFilters,
            UpdateChurchPayload, UpdateOnboardingPayload,
        },
        member::{AppRole, NewProfile, Profile, RoleGrant},
        ministry::{Ministry, MinistryTemplate},
    },
};

#[derive(Clone)]
pub struct ChurchRepository {
    pool: PgPool,
}

impl ChurchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  TELAS DE CONFIGURAÇÃO
    // =========================================================================

    pub async fn update_church(
        &self,
        church_id: Uuid,
        input: UpdateChurchPayload,
    ) -> Result<Church, AppError> {
        sqlx::query_as::<_, Church>(
            r#"
            UPDATE churches SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                settings = COALESCE($6, settings),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.name)
        .bind(input.address)
        .bind(input.phone)
        .bind(input.email)
        .bind(input.settings.map(Json))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn get_plan(&self, church_id: Uuid) -> Result<ChurchPlan, AppError> {
        sqlx::query_as::<_, ChurchPlan>("SELECT * FROM church_plans WHERE church_id = $1")
            .bind(church_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get_onboarding(&self, church_id: Uuid) -> Result<Onboarding, AppError> {
        sqlx::query_as::<_, Onboarding>("SELECT * FROM church_onboarding WHERE church_id = $1")
            .bind(church_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn update_onboarding(
        &self,
        church_id: Uuid,
        input: UpdateOnboardingPayload,
    ) -> Result<Onboarding, AppError> {
        sqlx::query_as::<_, Onboarding>(
            r#"
            UPDATE church_onboarding SET
                step = COALESCE($2, step),
                ministries_customized = COALESCE($3, ministries_customized),
                first_leader_added = COALESCE($4, first_leader_added),
                completed_at = CASE WHEN $5 THEN COALESCE(completed_at, NOW()) ELSE completed_at END,
                updated_at = NOW()
            WHERE church_id = $1
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.step)
        .bind(input.ministries_customized)
        .bind(input.first_leader_added)
        .bind(input.completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    // =========================================================================
    //  ESTATÍSTICAS
    // =========================================================================

    pub async fn list_stats(
        &self,
        church_id: Uuid,
        filters: &StatsFilters,
    ) -> Result<Vec<ChurchStats>, AppError> {
        let stats = sqlx::query_as::<_, ChurchStats>(
            r#"
            SELECT * FROM church_stats
            WHERE church_id = $1
              AND ($2::date IS NULL OR stat_date >= $2)
              AND ($3::date IS NULL OR stat_date <= $3)
            ORDER BY stat_date DESC
            "#,
        )
        .bind(church_id)
        .bind(filters.start_date)
        .bind(filters.end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Consolida os números do dia e grava (ou regrava) a linha daquele dia.
    /// Totais contam perfis criados até o dia; a média é de presentes por evento do dia.
    pub async fn calculate_stats(
        &self,
        church_id: Uuid,
        stat_date: NaiveDate,
    ) -> Result<ChurchStats, AppError> {
        let stats = sqlx::query_as::<_, ChurchStats>(
            r#"
            INSERT INTO church_stats
                (church_id, stat_date, total_members, active_members, new_members, events_count, average_attendance)
            SELECT
                $1,
                $2,
                (SELECT COUNT(*) FROM profiles WHERE church_id = $1 AND created_at::date <= $2)::int,
                (SELECT COUNT(*) FROM profiles
                    WHERE church_id = $1 AND created_at::date <= $2 AND status = 'ACTIVE')::int,
                (SELECT COUNT(*) FROM profiles WHERE church_id = $1 AND created_at::date = $2)::int,
                (SELECT COUNT(*) FROM events WHERE church_id = $1 AND event_date::date = $2)::int,
                COALESCE((
                    SELECT AVG(per_event.present)::numeric(10, 2)
                    FROM (
                        SELECT COUNT(a.id) FILTER (WHERE a.status = 'PRESENT') AS present
                        FROM events e
                        LEFT JOIN attendance a ON a.event_id = e.id
                        WHERE e.church_id = $1 AND e.event_date::date = $2
                        GROUP BY e.id
                    ) per_event
                ), 0)
            ON CONFLICT (church_id, stat_date) DO UPDATE SET
                total_members = EXCLUDED.total_members,
                active_members = EXCLUDED.active_members,
                new_members = EXCLUDED.new_members,
                events_count = EXCLUDED.events_count,
                average_attendance = EXCLUDED.average_attendance
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(stat_date)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("📊 Estatísticas de {} consolidadas para a igreja {}", stat_date, church_id);
        Ok(stats)
    }
}

#[async_trait]
impl ChurchStore for ChurchRepository {
    async fn create_church(&self, church: NewChurch) -> Result<Church, AppError> {
        let church = sqlx::query_as::<_, Church>(
            r#"
            INSERT INTO churches (name, address, phone, email, settings)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(church.name)
        .bind(church.address)
        .bind(church.phone)
        .bind(church.email)
        .bind(Json(church.settings))
        .fetch_one(&self.pool)
        .await?;

        Ok(church)
    }

    async fn find_church(&self, church_id: Uuid) -> Result<Option<Church>, AppError> {
        let church = sqlx::query_as::<_, Church>("SELECT * FROM churches WHERE id = $1")
            .bind(church_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(church)
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, AppError> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, church_id, name, phone, photo_url, status)
            VALUES ($1, $2, $3, $4, $5, 'ACTIVE')
            RETURNING *
            "#,
        )
        .bind(profile.id)
        .bind(profile.church_id)
        .bind(profile.name)
        .bind(profile.phone)
        .bind(profile.photo_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<RoleGrant, AppError> {
        let grant = sqlx::query_as::<_, RoleGrant>(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) RETURNING id, user_id, role",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(grant)
    }

    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<AppRole>, AppError> {
        let roles = sqlx::query_scalar::<_, AppRole>(
            "SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn find_pastor(&self, church_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let pastor = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT ur.user_id
            FROM user_roles ur
            JOIN profiles p ON p.id = ur.user_id
            WHERE ur.role = 'PASTOR' AND p.church_id = $1
            LIMIT 1
            "#,
        )
        .bind(church_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pastor)
    }

    async fn create_plan(&self, church_id: Uuid, tier: PlanTier) -> Result<ChurchPlan, AppError> {
        let quotas = tier.quotas();
        let features: Vec<String> = quotas.features.iter().map(|f| f.to_string()).collect();

        let plan = sqlx::query_as::<_, ChurchPlan>(
            r#"
            INSERT INTO church_plans (church_id, plan_type, max_leaders, max_members, features, status)
            VALUES ($1, $2, $3, $4, $5, 'active')
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(tier.as_str())
        .bind(quotas.max_leaders)
        .bind(quotas.max_members)
        .bind(features)
        .fetch_one(&self.pool)
        .await?;

        Ok(plan)
    }

    async fn create_ministries(
        &self,
        church_id: Uuid,
        templates: &[MinistryTemplate],
    ) -> Result<Vec<Ministry>, AppError> {
        if templates.is_empty() {
            return Ok(Vec::new());
        }

        // Inserção em massa num único INSERT: ou entram todos ou nenhum
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO ministries (church_id, internal_id, name, description, icon, color, features, is_active) ",
        );
        builder.push_values(templates, |mut row, template| {
            let features: Vec<String> = template.features.iter().map(|f| f.to_string()).collect();
            row.push_bind(church_id)
                .push_bind(template.internal_id)
                .push_bind(template.name)
                .push_bind(template.description)
                .push_bind(template.icon)
                .push_bind(template.color)
                .push_bind(features)
                .push_bind(true);
        });
        builder.push(" RETURNING *");

        let ministries = builder
            .build_query_as::<Ministry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(ministries)
    }

    async fn create_onboarding(&self, church_id: Uuid) -> Result<Onboarding, AppError> {
        // ministries_customized já nasce true: o catálogo acabou de ser semeado
        let onboarding = sqlx::query_as::<_, Onboarding>(
            r#"
            INSERT INTO church_onboarding (church_id, step, ministries_customized, first_leader_added)
            VALUES ($1, 1, TRUE, FALSE)
            RETURNING *
            "#,
        )
        .bind(church_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(onboarding)
    }

    async fn mark_first_leader_added(&self, church_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE church_onboarding
            SET first_leader_added = TRUE, updated_at = NOW()
            WHERE church_id = $1 AND first_leader_added = FALSE
            "#,
        )
        .bind(church_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
