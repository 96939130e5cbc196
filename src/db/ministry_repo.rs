// src/db/ministry_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ministry::{
        AddMinistryMemberPayload, CreateMinistryPayload, Ministry, MinistryMember, MinistryRole,
        MinistryRolePayload, UpdateMinistryMemberPayload, UpdateMinistryPayload,
    },
};

#[derive(Clone)]
pub struct MinistryRepository {
    pool: PgPool,
}

impl MinistryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_ministries(&self, church_id: Uuid) -> Result<Vec<Ministry>, AppError> {
        let ministries = sqlx::query_as::<_, Ministry>(
            "SELECT * FROM ministries WHERE church_id = $1 ORDER BY name ASC",
        )
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ministries)
    }

    // Ministérios criados pela igreja não têm internal_id
    pub async fn create_ministry(
        &self,
        church_id: Uuid,
        input: CreateMinistryPayload,
    ) -> Result<Ministry, AppError> {
        let ministry = sqlx::query_as::<_, Ministry>(
            r#"
            INSERT INTO ministries (church_id, name, description, icon, color, features, leader_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.icon)
        .bind(input.color)
        .bind(input.features)
        .bind(input.leader_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(ministry)
    }

    pub async fn update_ministry(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
        input: UpdateMinistryPayload,
    ) -> Result<Ministry, AppError> {
        sqlx::query_as::<_, Ministry>(
            r#"
            UPDATE ministries SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                icon = COALESCE($5, icon),
                color = COALESCE($6, color),
                features = COALESCE($7, features),
                leader_id = COALESCE($8, leader_id),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(ministry_id)
        .bind(church_id)
        .bind(input.name)
        .bind(input.description)
        .bind(input.icon)
        .bind(input.color)
        .bind(input.features)
        .bind(input.leader_id)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_ministry(&self, church_id: Uuid, ministry_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM ministries WHERE id = $1 AND church_id = $2")
            .bind(ministry_id)
            .bind(church_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  EQUIPE (a igreja vem sempre do ministério)
    // =========================================================================

    pub async fn list_ministry_members(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
    ) -> Result<Vec<MinistryMember>, AppError> {
        let members = sqlx::query_as::<_, MinistryMember>(
            r#"
            SELECT mm.id, mm.ministry_id, mm.user_id, mm.role, mm.joined_at, p.name, p.photo_url
            FROM ministry_members mm
            JOIN ministries m ON m.id = mm.ministry_id
            JOIN profiles p ON p.id = mm.user_id
            WHERE mm.ministry_id = $1 AND m.church_id = $2
            ORDER BY mm.joined_at DESC
            "#,
        )
        .bind(ministry_id)
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    /// Ministério e pessoa precisam ser da igreja; senão `NotFound`.
    pub async fn add_ministry_member(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
        input: AddMinistryMemberPayload,
    ) -> Result<MinistryMember, AppError> {
        sqlx::query_as::<_, MinistryMember>(
            r#"
            WITH inserted AS (
                INSERT INTO ministry_members (ministry_id, user_id, role)
                SELECT m.id, p.id, COALESCE($4, 'MEMBER')
                FROM ministries m
                JOIN profiles p ON p.id = $3 AND p.church_id = m.church_id
                WHERE m.id = $1 AND m.church_id = $2
                RETURNING *
            )
            SELECT i.id, i.ministry_id, i.user_id, i.role, i.joined_at, p.name, p.photo_url
            FROM inserted i
            JOIN profiles p ON p.id = i.user_id
            "#,
        )
        .bind(ministry_id)
        .bind(church_id)
        .bind(input.user_id)
        .bind(input.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::BadRequest("A pessoa já faz parte deste ministério.".into());
                }
            }
            e.into()
        })?
        .ok_or(AppError::NotFound)
    }

    pub async fn update_ministry_member(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
        member_id: Uuid,
        input: UpdateMinistryMemberPayload,
    ) -> Result<MinistryMember, AppError> {
        sqlx::query_as::<_, MinistryMember>(
            r#"
            WITH updated AS (
                UPDATE ministry_members mm SET role = $4
                FROM ministries m
                WHERE mm.id = $1 AND mm.ministry_id = $2
                  AND m.id = mm.ministry_id AND m.church_id = $3
                RETURNING mm.*
            )
            SELECT u.id, u.ministry_id, u.user_id, u.role, u.joined_at, p.name, p.photo_url
            FROM updated u
            JOIN profiles p ON p.id = u.user_id
            "#,
        )
        .bind(member_id)
        .bind(ministry_id)
        .bind(church_id)
        .bind(input.role)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn remove_ministry_member(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM ministry_members mm
            USING ministries m
            WHERE mm.id = $1 AND mm.ministry_id = $2
              AND m.id = mm.ministry_id AND m.church_id = $3
            "#,
        )
        .bind(member_id)
        .bind(ministry_id)
        .bind(church_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // =========================================================================
    //  FUNÇÕES
    // =========================================================================

    pub async fn list_ministry_roles(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
    ) -> Result<Vec<MinistryRole>, AppError> {
        let roles = sqlx::query_as::<_, MinistryRole>(
            r#"
            SELECT r.* FROM ministry_roles r
            JOIN ministries m ON m.id = r.ministry_id
            WHERE r.ministry_id = $1 AND m.church_id = $2
            ORDER BY r.role_name ASC
            "#,
        )
        .bind(ministry_id)
        .bind(church_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn create_ministry_role(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
        input: MinistryRolePayload,
    ) -> Result<MinistryRole, AppError> {
        sqlx::query_as::<_, MinistryRole>(
            r#"
            INSERT INTO ministry_roles (ministry_id, role_name, description)
            SELECT m.id, $3, $4 FROM ministries m
            WHERE m.id = $1 AND m.church_id = $2
            RETURNING *
            "#,
        )
        .bind(ministry_id)
        .bind(church_id)
        .bind(input.role_name)
        .bind(input.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn update_ministry_role(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
        role_id: Uuid,
        input: MinistryRolePayload,
    ) -> Result<MinistryRole, AppError> {
        sqlx::query_as::<_, MinistryRole>(
            r#"
            UPDATE ministry_roles r SET
                role_name = $4,
                description = COALESCE($5, r.description)
            FROM ministries m
            WHERE r.id = $1 AND r.ministry_id = $2
              AND m.id = r.ministry_id AND m.church_id = $3
            RETURNING r.*
            "#,
        )
        .bind(role_id)
        .bind(ministry_id)
        .bind(church_id)
        .bind(input.role_name)
        .bind(input.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_ministry_role(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
        role_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM ministry_roles r
            USING ministries m
            WHERE r.id = $1 AND r.ministry_id = $2
              AND m.id = r.ministry_id AND m.church_id = $3
            "#,
        )
        .bind(role_id)
        .bind(ministry_id)
        .bind(church_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
