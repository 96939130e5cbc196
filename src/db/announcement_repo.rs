// src/db/announcement_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::announcement::{
        Announcement, AnnouncementFilters, AnnouncementView, CreateAnnouncementPayload,
        UpdateAnnouncementPayload,
    },
};

#[derive(Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Fixados primeiro, depois os mais recentes
    pub async fn list_announcements(
        &self,
        church_id: Uuid,
        filters: &AnnouncementFilters,
    ) -> Result<Vec<Announcement>, AppError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM announcements WHERE church_id = ");
        query.push_bind(church_id);

        if let Some(category) = &filters.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(ministry_id) = filters.ministry_id {
            query.push(" AND ministry_id = ").push_bind(ministry_id);
        }
        query.push(" ORDER BY is_pinned DESC, publish_at DESC");

        let announcements = query
            .build_query_as::<Announcement>()
            .fetch_all(&self.pool)
            .await?;
        Ok(announcements)
    }

    pub async fn create_announcement(
        &self,
        church_id: Uuid,
        created_by: Uuid,
        input: CreateAnnouncementPayload,
    ) -> Result<Announcement, AppError> {
        let announcement = sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (
                church_id, ministry_id, title, content, category, image_url,
                is_pinned, is_public, is_urgent, target_profiles, publish_at, expires_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, NOW()), $12, $13)
            RETURNING *
            "#,
        )
        .bind(church_id)
        .bind(input.ministry_id)
        .bind(input.title)
        .bind(input.content)
        .bind(input.category)
        .bind(input.image_url)
        .bind(input.is_pinned)
        .bind(input.is_public)
        .bind(input.is_urgent)
        .bind(input.target_profiles)
        .bind(input.publish_at)
        .bind(input.expires_at)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(announcement)
    }

    pub async fn update_announcement(
        &self,
        church_id: Uuid,
        announcement_id: Uuid,
        input: UpdateAnnouncementPayload,
    ) -> Result<Announcement, AppError> {
        sqlx::query_as::<_, Announcement>(
            r#"
            UPDATE announcements SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                category = COALESCE($5, category),
                ministry_id = COALESCE($6, ministry_id),
                image_url = COALESCE($7, image_url),
                is_pinned = COALESCE($8, is_pinned),
                is_public = COALESCE($9, is_public),
                is_urgent = COALESCE($10, is_urgent),
                publish_at = COALESCE($11, publish_at),
                expires_at = COALESCE($12, expires_at),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(announcement_id)
        .bind(church_id)
        .bind(input.title)
        .bind(input.content)
        .bind(input.category)
        .bind(input.ministry_id)
        .bind(input.image_url)
        .bind(input.is_pinned)
        .bind(input.is_public)
        .bind(input.is_urgent)
        .bind(input.publish_at)
        .bind(input.expires_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    pub async fn delete_announcement(
        &self,
        church_id: Uuid,
        announcement_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1 AND church_id = $2")
            .bind(announcement_id)
            .bind(church_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Marca o aviso como lido. Repetir só atualiza o horário.
    pub async fn record_view(
        &self,
        church_id: Uuid,
        announcement_id: Uuid,
        user_id: Uuid,
    ) -> Result<AnnouncementView, AppError> {
        sqlx::query_as::<_, AnnouncementView>(
            r#"
            INSERT INTO announcement_views (announcement_id, user_id)
            SELECT a.id, $3
            FROM announcements a
            WHERE a.id = $1 AND a.church_id = $2
            ON CONFLICT (announcement_id, user_id) DO UPDATE SET viewed_at = NOW()
            RETURNING *
            "#,
        )
        .bind(announcement_id)
        .bind(church_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }
}
