// src/services/registration_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::ChurchStore,
    models::{
        church::{ChurchSettings, NewChurch, PlanTier, RegisterChurchPayload, RegisteredChurch},
        member::{AppRole, NewProfile},
        ministry::PREDEFINED_MINISTRIES,
    },
    services::auth::AuthService,
};

// Mensagem que o banco devolveu, sem o prefixo do nosso Display
fn store_message(err: &AppError) -> String {
    match err {
        AppError::DatabaseError(e) => e
            .as_database_error()
            .map(|db_err| db_err.message().to_string())
            .unwrap_or_else(|| e.to_string()),
        other => other.to_string(),
    }
}

fn step_failure(step: &'static str, wrap: fn(String) -> AppError) -> impl Fn(AppError) -> AppError {
    move |err| {
        let detail = store_message(&err);
        tracing::error!("🔥 Falha na etapa '{}' do cadastro: {}", step, detail);
        wrap(detail)
    }
}

/// Provisiona uma igreja nova: principal, igreja, perfil, cargo PASTOR, plano,
/// ministérios padrão e onboarding, nesta ordem.
///
/// Cada etapa grava sozinha. Se a etapa N falha, o que as etapas anteriores
/// criaram continua no banco.
#[derive(Clone)]
pub struct RegistrationService {
    auth: AuthService,
    churches: Arc<dyn ChurchStore>,
}

impl RegistrationService {
    pub fn new(auth: AuthService, churches: Arc<dyn ChurchStore>) -> Self {
        Self { auth, churches }
    }

    pub async fn register_church(
        &self,
        payload: RegisterChurchPayload,
    ) -> Result<RegisteredChurch, AppError> {
        tracing::info!("Iniciando cadastro da igreja '{}'", payload.church_name);

        // 1. Principal
        let user = self
            .auth
            .issue_principal(&payload.email, &payload.password)
            .await
            .inspect_err(|e| tracing::error!("🔥 Falha ao criar o usuário: {}", e))?;
        tracing::info!("✅ Usuário criado: {}", user.id);

        // 2. Igreja (tenant)
        let church = self
            .churches
            .create_church(NewChurch {
                name: payload.church_name,
                address: payload.address,
                phone: payload.phone.clone(),
                email: Some(payload.email),
                settings: ChurchSettings {
                    cnpj: payload.cnpj,
                    church_type: payload.church_type,
                    church_size: payload.church_size,
                },
            })
            .await
            .map_err(step_failure("igreja", AppError::TenantCreateError))?;
        tracing::info!("✅ Igreja criada: {}", church.id);

        // 3. Perfil ligado à igreja
        self.churches
            .create_profile(NewProfile {
                id: user.id,
                church_id: church.id,
                name: payload.full_name,
                phone: payload.phone,
                photo_url: None,
            })
            .await
            .map_err(step_failure("perfil", AppError::ProfileCreateError))?;
        tracing::info!("✅ Perfil criado para {}", user.id);

        // 4. Cargo PASTOR. Igreja nova, então não há pastor anterior para checar
        self.churches
            .grant_role(user.id, AppRole::Pastor)
            .await
            .map_err(step_failure("cargo", AppError::RoleGrantError))?;
        tracing::info!("✅ Cargo PASTOR atribuído a {}", user.id);

        // 5. Plano
        let tier = PlanTier::from_plan_type(&payload.plan_type);
        self.churches
            .create_plan(church.id, tier)
            .await
            .map_err(step_failure("plano", AppError::PlanCreateError))?;
        tracing::info!("✅ Plano '{}' criado para a igreja {}", tier.as_str(), church.id);

        // 6. Ministérios padrão
        let ministries = self
            .churches
            .create_ministries(church.id, &PREDEFINED_MINISTRIES)
            .await
            .map_err(step_failure("ministérios", AppError::MinistrySeedError))?;
        tracing::info!("✅ {} ministérios criados", ministries.len());

        // 7. Onboarding
        self.churches
            .create_onboarding(church.id)
            .await
            .map_err(step_failure("onboarding", AppError::OnboardingCreateError))?;
        tracing::info!("✅ Onboarding criado. Cadastro da igreja {} concluído", church.id);

        Ok(RegisteredChurch { church_id: church.id, user_id: user.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::{FailPoint, MemoryStore};

    fn setup() -> (Arc<MemoryStore>, RegistrationService) {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone(), "segredo".into(), 4, 7);
        let service = RegistrationService::new(auth, store.clone());
        (store, service)
    }

    fn payload(plan_type: &str) -> RegisterChurchPayload {
        RegisterChurchPayload {
            email: "p@x.com".into(),
            password: "secret1".into(),
            full_name: "Ana".into(),
            church_name: "Graça Viva".into(),
            address: Some("Rua 1".into()),
            phone: Some("11999990000".into()),
            plan_type: plan_type.into(),
            cnpj: None,
            church_type: None,
            church_size: None,
        }
    }

    #[tokio::test]
    async fn premium_registration_provisions_every_row() {
        let (store, service) = setup();
        let registered = service.register_church(payload("premium")).await.unwrap();
        let state = store.snapshot();

        assert_eq!(state.churches.len(), 1);
        assert_eq!(state.churches[0].id, registered.church_id);
        assert_eq!(state.churches[0].name, "Graça Viva");

        let plan = &state.plans[0];
        assert_eq!(plan.church_id, registered.church_id);
        assert_eq!((plan.max_leaders, plan.max_members), (5, 500));
        assert_eq!(plan.status, "active");

        assert_eq!(state.ministries.len(), 7);

        let pastors: Vec<_> = state.roles.iter().filter(|g| g.role == AppRole::Pastor).collect();
        assert_eq!(pastors.len(), 1);
        assert_eq!(pastors[0].user_id, registered.user_id);
        let profile = state.profiles.iter().find(|p| p.id == registered.user_id).unwrap();
        assert_eq!(profile.name, "Ana");

        let onboarding = &state.onboardings[0];
        assert_eq!(onboarding.step, 1);
        assert!(onboarding.ministries_customized);
        assert!(!onboarding.first_leader_added);
    }

    #[tokio::test]
    async fn profile_points_at_an_existing_church() {
        let (store, service) = setup();
        service.register_church(payload("freemium")).await.unwrap();
        let state = store.snapshot();

        let profile = &state.profiles[0];
        let church_id = profile.church_id.unwrap();
        assert!(state.churches.iter().any(|c| c.id == church_id));
    }

    #[tokio::test]
    async fn plan_quotas_follow_the_tier_table() {
        for (raw, leaders, members) in [
            ("freemium", 1, 100),
            ("premium", 5, 500),
            ("enterprise", 999, 9999),
            ("diamante", 1, 100),
        ] {
            let (store, service) = setup();
            service.register_church(payload(raw)).await.unwrap();
            let plan = store.snapshot().plans.remove(0);
            assert_eq!((plan.max_leaders, plan.max_members), (leaders, members), "{}", raw);
            let expected: Vec<String> = PlanTier::from_plan_type(raw)
                .quotas()
                .features
                .iter()
                .map(|f| f.to_string())
                .collect();
            assert_eq!(plan.features, expected);
        }
    }

    #[tokio::test]
    async fn unknown_plan_type_is_stored_as_freemium() {
        let (store, service) = setup();
        service.register_church(payload("gold")).await.unwrap();
        assert_eq!(store.snapshot().plans[0].plan_type, "freemium");
    }

    #[tokio::test]
    async fn seeds_the_seven_ministries_once() {
        let (store, service) = setup();
        let registered = service.register_church(payload("premium")).await.unwrap();
        let state = store.snapshot();

        let mut ids: Vec<String> = state
            .ministries
            .iter()
            .filter(|m| m.church_id == registered.church_id)
            .map(|m| m.internal_id.clone().unwrap())
            .collect();
        ids.sort();
        assert_eq!(
            ids,
            vec!["comunicacao", "diaconia", "estudo", "evangelismo", "intercession", "louvor", "midia"]
        );
        assert!(state.ministries.iter().all(|m| m.is_active));
    }

    #[tokio::test]
    async fn failed_plan_step_keeps_earlier_rows() {
        let (store, service) = setup();
        store.fail_at(FailPoint::CreatePlan);

        let err = service.register_church(payload("premium")).await.unwrap_err();
        assert!(matches!(err, AppError::PlanCreateError(ref msg) if msg.contains("falha simulada")));

        let state = store.snapshot();
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.churches.len(), 1);
        assert_eq!(state.profiles.len(), 1);
        assert_eq!(state.roles.len(), 1);
        assert!(state.plans.is_empty());
        assert!(state.ministries.is_empty());
        assert!(state.onboardings.is_empty());
    }

    #[tokio::test]
    async fn each_step_reports_its_own_error() {
        let cases: [(FailPoint, fn(&AppError) -> bool); 6] = [
            (FailPoint::CreateChurch, |e| matches!(e, AppError::TenantCreateError(_))),
            (FailPoint::CreateProfile, |e| matches!(e, AppError::ProfileCreateError(_))),
            (FailPoint::GrantRole, |e| matches!(e, AppError::RoleGrantError(_))),
            (FailPoint::CreatePlan, |e| matches!(e, AppError::PlanCreateError(_))),
            (FailPoint::CreateMinistries, |e| matches!(e, AppError::MinistrySeedError(_))),
            (FailPoint::CreateOnboarding, |e| matches!(e, AppError::OnboardingCreateError(_))),
        ];

        for (point, expected) in cases {
            let (store, service) = setup();
            store.fail_at(point);
            let err = service.register_church(payload("premium")).await.unwrap_err();
            assert!(expected(&err), "{:?} -> {:?}", point, err);
        }
    }

    #[tokio::test]
    async fn duplicate_email_stops_before_the_church() {
        let (store, service) = setup();
        service.register_church(payload("premium")).await.unwrap();

        let err = service.register_church(payload("premium")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity(_)));
        assert_eq!(store.snapshot().churches.len(), 1);
    }
}
