// src/models/member.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "app_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppRole {
    Pastor,
    Leader,
    Minister,
    Member,
    Visitor,
}

impl AppRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppRole::Pastor => "PASTOR",
            AppRole::Leader => "LEADER",
            AppRole::Minister => "MINISTER",
            AppRole::Member => "MEMBER",
            AppRole::Visitor => "VISITOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "profile_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileStatus {
    Active,
    Inactive,
}

// --- Structs ---

// Pessoa dentro da igreja. O id é o mesmo do usuário (1:1).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub church_id: Option<Uuid>,

    #[schema(example = "Ana Souza")]
    pub name: String,

    #[schema(example = "11999990000")]
    pub phone: Option<String>,

    pub photo_url: Option<String>,
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleGrant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: AppRole,
}

// Linha da listagem de membros: perfil + e-mail + cargos
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(flatten)]
    pub profile: Profile,
    pub email: String,
    pub roles: Vec<AppRole>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberPage {
    pub members: Vec<Member>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

// Dados de entrada para gravar um perfil (usado pelos stores)
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: Uuid,
    pub church_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

// --- Payloads ---

// Formato de wire fixo: { email, password, name, phone?, church_id, role, photo_url? }
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMemberPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    pub phone: Option<String>,
    pub church_id: Uuid,
    pub role: AppRole,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateMemberResponse {
    pub success: bool,
    pub message: String,
    pub user: Member,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
    pub status: Option<ProfileStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantRolePayload {
    pub role: AppRole,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MemberFilters {
    /// Busca por nome ou telefone
    pub search: Option<String>,
    pub role: Option<AppRole>,
    pub status: Option<ProfileStatus>,
    #[validate(range(min = 1, message = "A página começa em 1."))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "O tamanho da página deve estar entre 1 e 100."))]
    pub page_size: Option<u32>,
}

impl MemberFilters {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(Self::DEFAULT_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.page_size())
    }
}

pub fn total_pages(total: i64, page_size: u32) -> u32 {
    if total <= 0 || page_size == 0 {
        return 0;
    }
    ((total as u64).div_ceil(u64::from(page_size))) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let filters = MemberFilters::default();
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.page_size(), 10);
        assert_eq!(filters.offset(), 0);

        let filters = MemberFilters { page: Some(3), page_size: Some(20), ..Default::default() };
        assert_eq!(filters.offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
    }

    #[test]
    fn roles_use_upper_case_on_the_wire() {
        let json = serde_json::to_string(&AppRole::Pastor).unwrap();
        assert_eq!(json, "\"PASTOR\"");
        let role: AppRole = serde_json::from_str("\"MINISTER\"").unwrap();
        assert_eq!(role, AppRole::Minister);
    }
}
