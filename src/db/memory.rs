// src/db/memory.rs
//
// Armazenamento em memória para os testes dos serviços, com falha injetável por etapa.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{ChurchStore, ScheduleStore, UserStore},
    models::{
        auth::User,
        church::{Church, ChurchPlan, NewChurch, Onboarding, PlanTier},
        event::{Event, NewSchedule, Schedule, ScheduleConflict},
        member::{AppRole, NewProfile, Profile, ProfileStatus, RoleGrant},
        ministry::{Ministry, MinistryTemplate},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    CreateUser,
    CreateChurch,
    CreateProfile,
    GrantRole,
    CreatePlan,
    CreateMinistries,
    CreateOnboarding,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: Vec<User>,
    pub churches: Vec<Church>,
    pub profiles: Vec<Profile>,
    pub roles: Vec<RoleGrant>,
    pub plans: Vec<ChurchPlan>,
    pub ministries: Vec<Ministry>,
    pub onboardings: Vec<Onboarding>,
    pub events: Vec<Event>,
    pub schedules: Vec<Schedule>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_at: Mutex<Option<FailPoint>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_at(&self, point: FailPoint) {
        *self.fail_at.lock().unwrap() = Some(point);
    }

    pub fn snapshot(&self) -> MemoryState {
        self.state.lock().unwrap().clone()
    }

    fn check(&self, point: FailPoint) -> Result<(), AppError> {
        if *self.fail_at.lock().unwrap() == Some(point) {
            return Err(AppError::DatabaseError(sqlx::Error::Protocol(format!(
                "falha simulada em {:?}",
                point
            ))));
        }
        Ok(())
    }

    pub fn insert_event(&self, church_id: Uuid, title: &str, event_date: DateTime<Utc>) -> Event {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            church_id,
            title: title.to_string(),
            description: None,
            event_date,
            event_type: "CULTO".to_string(),
            status: "SCHEDULED".to_string(),
            created_by: None,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().events.push(event.clone());
        event
    }

    pub fn insert_ministry(&self, church_id: Uuid, name: &str) -> Ministry {
        let now = Utc::now();
        let ministry = Ministry {
            id: Uuid::new_v4(),
            church_id,
            internal_id: None,
            name: name.to_string(),
            description: None,
            icon: None,
            color: None,
            features: Vec::new(),
            leader_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().ministries.push(ministry.clone());
        ministry
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        self.check(FailPoint::CreateUser)?;
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateIdentity(format!(
                "Já existe um usuário cadastrado com o e-mail {}",
                email
            )));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ChurchStore for MemoryStore {
    async fn create_church(&self, church: NewChurch) -> Result<Church, AppError> {
        self.check(FailPoint::CreateChurch)?;
        let now = Utc::now();
        let church = Church {
            id: Uuid::new_v4(),
            name: church.name,
            address: church.address,
            phone: church.phone,
            email: church.email,
            settings: Json(church.settings),
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().churches.push(church.clone());
        Ok(church)
    }

    async fn find_church(&self, church_id: Uuid) -> Result<Option<Church>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.churches.iter().find(|c| c.id == church_id).cloned())
    }

    async fn create_profile(&self, profile: NewProfile) -> Result<Profile, AppError> {
        self.check(FailPoint::CreateProfile)?;
        let now = Utc::now();
        let profile = Profile {
            id: profile.id,
            church_id: Some(profile.church_id),
            name: profile.name,
            phone: profile.phone,
            photo_url: profile.photo_url,
            status: ProfileStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<RoleGrant, AppError> {
        self.check(FailPoint::GrantRole)?;
        let grant = RoleGrant { id: Uuid::new_v4(), user_id, role };
        self.state.lock().unwrap().roles.push(grant.clone());
        Ok(grant)
    }

    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<AppRole>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .roles
            .iter()
            .filter(|g| g.user_id == user_id)
            .map(|g| g.role)
            .collect())
    }

    async fn find_pastor(&self, church_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let state = self.state.lock().unwrap();
        let pastor = state
            .roles
            .iter()
            .filter(|g| g.role == AppRole::Pastor)
            .find(|g| {
                state
                    .profiles
                    .iter()
                    .any(|p| p.id == g.user_id && p.church_id == Some(church_id))
            })
            .map(|g| g.user_id);
        Ok(pastor)
    }

    async fn create_plan(&self, church_id: Uuid, tier: PlanTier) -> Result<ChurchPlan, AppError> {
        self.check(FailPoint::CreatePlan)?;
        let quotas = tier.quotas();
        let now = Utc::now();
        let plan = ChurchPlan {
            id: Uuid::new_v4(),
            church_id,
            plan_type: tier.as_str().to_string(),
            max_leaders: quotas.max_leaders,
            max_members: quotas.max_members,
            features: quotas.features.iter().map(|f| f.to_string()).collect(),
            status: "active".to_string(),
            started_at: now,
            expires_at: None,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().plans.push(plan.clone());
        Ok(plan)
    }

    async fn create_ministries(
        &self,
        church_id: Uuid,
        templates: &[MinistryTemplate],
    ) -> Result<Vec<Ministry>, AppError> {
        self.check(FailPoint::CreateMinistries)?;
        let now = Utc::now();
        let ministries: Vec<Ministry> = templates
            .iter()
            .map(|t| Ministry {
                id: Uuid::new_v4(),
                church_id,
                internal_id: Some(t.internal_id.to_string()),
                name: t.name.to_string(),
                description: Some(t.description.to_string()),
                icon: Some(t.icon.to_string()),
                color: Some(t.color.to_string()),
                features: t.features.iter().map(|f| f.to_string()).collect(),
                leader_id: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .collect();
        self.state.lock().unwrap().ministries.extend(ministries.iter().cloned());
        Ok(ministries)
    }

    async fn create_onboarding(&self, church_id: Uuid) -> Result<Onboarding, AppError> {
        self.check(FailPoint::CreateOnboarding)?;
        let now = Utc::now();
        let onboarding = Onboarding {
            id: Uuid::new_v4(),
            church_id,
            step: 1,
            ministries_customized: true,
            first_leader_added: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().onboardings.push(onboarding.clone());
        Ok(onboarding)
    }

    async fn mark_first_leader_added(&self, church_id: Uuid) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        for onboarding in state.onboardings.iter_mut().filter(|o| o.church_id == church_id) {
            onboarding.first_leader_added = true;
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn find_event(&self, church_id: Uuid, event_id: Uuid) -> Result<Option<Event>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .events
            .iter()
            .find(|e| e.id == event_id && e.church_id == church_id)
            .cloned())
    }

    async fn find_ministry(
        &self,
        church_id: Uuid,
        ministry_id: Uuid,
    ) -> Result<Option<Ministry>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .ministries
            .iter()
            .find(|m| m.id == ministry_id && m.church_id == church_id)
            .cloned())
    }

    async fn find_conflicts(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        event_date: DateTime<Utc>,
        exclude_event_id: Option<Uuid>,
    ) -> Result<Vec<ScheduleConflict>, AppError> {
        let state = self.state.lock().unwrap();
        let conflicts = state
            .schedules
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                state
                    .events
                    .iter()
                    .find(|e| e.id == s.event_id)
                    .map(|e| (s, e))
            })
            .filter(|(_, e)| {
                e.church_id == church_id
                    && e.event_date == event_date
                    && Some(e.id) != exclude_event_id
            })
            .map(|(s, e)| ScheduleConflict {
                conflict_event_id: e.id,
                conflict_event_title: e.title.clone(),
                conflict_event_date: e.event_date,
                conflict_role: s.role.clone(),
            })
            .collect();
        Ok(conflicts)
    }

    async fn create_schedule(&self, schedule: NewSchedule) -> Result<Schedule, AppError> {
        let now = Utc::now();
        let schedule = Schedule {
            id: Uuid::new_v4(),
            event_id: schedule.event_id,
            ministry_id: schedule.ministry_id,
            user_id: schedule.user_id,
            role: schedule.role,
            confirmed: false,
            notes: schedule.notes,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().schedules.push(schedule.clone());
        Ok(schedule)
    }
}
