// src/db/member_repo.rs

use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::member::{
        total_pages, AppRole, Member, MemberFilters, MemberPage, Profile, ProfileStatus,
        UpdateMemberPayload,
    },
};

#[derive(FromRow)]
struct MemberRow {
    #[sqlx(flatten)]
    profile: Profile,
    email: String,
}

#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Filtros comuns da contagem e da página
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, church_id: Uuid, filters: &MemberFilters) {
        builder.push(" WHERE p.church_id = ").push_bind(church_id);

        if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            builder
                .push(" AND (p.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR p.phone ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(status) = filters.status {
            builder.push(" AND p.status = ").push_bind(status);
        }

        if let Some(role) = filters.role {
            builder
                .push(" AND EXISTS (SELECT 1 FROM user_roles ur WHERE ur.user_id = p.id AND ur.role = ")
                .push_bind(role)
                .push(")");
        }
    }

    pub async fn list_members(
        &self,
        church_id: Uuid,
        filters: &MemberFilters,
    ) -> Result<MemberPage, AppError> {
        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM profiles p");
        Self::push_filters(&mut count_query, church_id, filters);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT p.*, u.email FROM profiles p JOIN users u ON u.id = p.id");
        Self::push_filters(&mut page_query, church_id, filters);
        page_query
            .push(" ORDER BY p.name ASC LIMIT ")
            .push_bind(i64::from(filters.page_size()))
            .push(" OFFSET ")
            .push_bind(filters.offset());

        let rows: Vec<MemberRow> = page_query.build_query_as().fetch_all(&self.pool).await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.profile.id).collect();
        let mut roles = self.roles_by_user(&ids).await?;

        let members = rows
            .into_iter()
            .map(|row| Member {
                roles: roles.remove(&row.profile.id).unwrap_or_default(),
                email: row.email,
                profile: row.profile,
            })
            .collect();

        Ok(MemberPage {
            members,
            total,
            page: filters.page(),
            page_size: filters.page_size(),
            total_pages: total_pages(total, filters.page_size()),
        })
    }

    pub async fn find_member(&self, church_id: Uuid, user_id: Uuid) -> Result<Member, AppError> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT p.*, u.email
            FROM profiles p
            JOIN users u ON u.id = p.id
            WHERE p.id = $1 AND p.church_id = $2
            "#,
        )
        .bind(user_id)
        .bind(church_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;

        let mut roles = self.roles_by_user(&[user_id]).await?;
        Ok(Member {
            roles: roles.remove(&user_id).unwrap_or_default(),
            email: row.email,
            profile: row.profile,
        })
    }

    async fn roles_by_user(&self, user_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<AppRole>>, AppError> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let grants = sqlx::query_as::<_, (Uuid, AppRole)>(
            "SELECT user_id, role FROM user_roles WHERE user_id = ANY($1) ORDER BY role",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_user: HashMap<Uuid, Vec<AppRole>> = HashMap::new();
        for (user_id, role) in grants {
            by_user.entry(user_id).or_default().push(role);
        }
        Ok(by_user)
    }

    pub async fn update_member(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        input: UpdateMemberPayload,
    ) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET
                name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                photo_url = COALESCE($5, photo_url),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(church_id)
        .bind(input.name)
        .bind(input.phone)
        .bind(input.photo_url)
        .bind(input.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }

    /// Remoção lógica: o perfil fica INACTIVE, nunca é apagado.
    pub async fn deactivate_member(&self, church_id: Uuid, user_id: Uuid) -> Result<Profile, AppError> {
        sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles SET status = $3, updated_at = NOW()
            WHERE id = $1 AND church_id = $2
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(church_id)
        .bind(ProfileStatus::Inactive)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)
    }
}
