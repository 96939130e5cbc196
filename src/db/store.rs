// src/db/store.rs
//
// Pontos de costura entre as regras de cadastro/escala e o armazenamento.
// Os repositórios Postgres implementam estas traits; os testes usam o `MemoryStore`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        church::{Church, ChurchPlan, NewChurch, Onboarding, PlanTier},
        event::{Event, NewSchedule, Schedule, ScheduleConflict},
        member::{AppRole, NewProfile, Profile, RoleGrant},
        ministry::{Ministry, MinistryTemplate},
    },
};

/// Principais (login). O e-mail é único: duplicado vira `DuplicateIdentity`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

/// Linhas criadas no cadastro da igreja e consultas de cargo.
/// Cada chamada grava sozinha; não há transação envolvendo várias etapas.
#[async_trait]
pub trait ChurchStore: Send + Sync {
    async fn create_church(&self, church: NewChurch) -> Result<Church, AppError>;
    async fn find_church(&self, church_id: Uuid) -> Result<Option<Church>, AppError>;

    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, AppError>;
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError>;

    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<RoleGrant, AppError>;
    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<AppRole>, AppError>;
    /// Algum PASTOR cujo perfil pertence à igreja.
    async fn find_pastor(&self, church_id: Uuid) -> Result<Option<Uuid>, AppError>;

    async fn create_plan(&self, church_id: Uuid, tier: PlanTier) -> Result<ChurchPlan, AppError>;

    async fn create_ministries(
        &self,
        church_id: Uuid,
        templates: &[MinistryTemplate],
    ) -> Result<Vec<Ministry>, AppError>;

    async fn create_onboarding(&self, church_id: Uuid) -> Result<Onboarding, AppError>;
    async fn mark_first_leader_added(&self, church_id: Uuid) -> Result<(), AppError>;
}

/// Eventos e escalas, para a checagem de conflito de horário.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn find_event(&self, church_id: Uuid, event_id: Uuid) -> Result<Option<Event>, AppError>;

    async fn find_ministry(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
    ) -> Result<Option<Ministry>, AppError>;

    /// Escalas da pessoa em eventos da igreja com `event_date` exatamente igual,
    /// exceto `exclude_event_id`.
    async fn find_conflicts(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        event_date: DateTime<Utc>,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Vec<ScheduleConflict>, AppError>;

    async fn create_schedule(&self, schedule: NewSchedule) -> Result<Schedule, AppError>;
}
