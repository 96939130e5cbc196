// src/services/member_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ChurchStore,
    models::member::{AppRole, CreateMemberPayload, Member, NewProfile, RoleGrant},
    services::auth::AuthService,
};

/// Regra de um PASTOR por igreja, usada por todo caminho que concede cargo.
///
/// É checar-e-depois-gravar: duas requisições simultâneas podem passar as duas.
pub async fn ensure_pastor_slot_available(
    churches: &dyn ChurchStore,
    church_id: Uuid,
    role: AppRole,
) -> Result<(), AppError> {
    if role != AppRole::Pastor {
        return Ok(());
    }
    if churches.find_pastor(church_id).await?.is_some() {
        tracing::warn!("Tentativa de segundo PASTOR na igreja {}", church_id);
        return Err(AppError::DuplicatePastor);
    }
    Ok(())
}

#[derive(Clone)]
pub struct MemberService {
    auth: AuthService,
    churches: Arc<dyn ChurchStore>,
}

impl MemberService {
    pub fn new(auth: AuthService, churches: Arc<dyn ChurchStore>) -> Self {
        Self { auth, churches }
    }

    /// Cadastra uma pessoa na igreja com login próprio. Só PASTOR ou LEADER.
    pub async fn create_member(
        &self,
        church_id: Uuid,
        caller_roles: &[AppRole],
        payload: CreateMemberPayload,
    ) -> Result<Member, AppError> {
        if !caller_roles
            .iter()
            .any(|r| matches!(r, AppRole::Pastor | AppRole::Leader))
        {
            return Err(AppError::PermissionDenied);
        }
        // O corpo não pode apontar para outra igreja
        if payload.church_id != church_id {
            return Err(AppError::PermissionDenied);
        }

        ensure_pastor_slot_available(self.churches.as_ref(), church_id, payload.role).await?;

        let user = self
            .auth
            .issue_principal(&payload.email, &payload.password)
            .await?;

        let profile = self
            .churches
            .create_profile(NewProfile {
                id: user.id,
                church_id,
                name: payload.name,
                phone: payload.phone,
                photo_url: payload.photo_url,
            })
            .await?;

        self.churches.grant_role(user.id, payload.role).await?;
        if payload.role == AppRole::Leader {
            self.churches.mark_first_leader_added(church_id).await?;
        }

        tracing::info!(
            "👤 Membro {} cadastrado na igreja {} como {}",
            user.id,
            church_id,
            payload.role.as_str()
        );

        Ok(Member { profile, email: user.email, roles: vec![payload.role] })
    }

    /// Concede um cargo extra a alguém que já é da igreja.
    pub async fn grant_role(
        &self,
        church_id: Uuid,
        user_id: Uuid,
        role: AppRole,
    ) -> Result<RoleGrant, AppError> {
        let profile = self
            .churches
            .find_profile(user_id)
            .await?
            .filter(|p| p.church_id == Some(church_id))
            .ok_or(AppError::NotFound)?;

        let current = self.churches.roles_for_user(profile.id).await?;
        if current.contains(&role) {
            return Err(AppError::BadRequest(format!(
                "O usuário já possui o cargo {}",
                role.as_str()
            )));
        }

        ensure_pastor_slot_available(self.churches.as_ref(), church_id, role).await?;

        let grant = self.churches.grant_role(profile.id, role).await?;
        if role == AppRole::Leader {
            self.churches.mark_first_leader_added(church_id).await?;
        }
        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::MemoryStore,
        models::church::RegisterChurchPayload,
        services::registration_service::RegistrationService,
    };

    struct Fixture {
        store: Arc<MemoryStore>,
        members: MemberService,
        church_id: Uuid,
        pastor_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone(), "segredo".into(), 4, 7);
        let registration = RegistrationService::new(auth.clone(), store.clone());
        let registered = registration
            .register_church(RegisterChurchPayload {
                email: "p@x.com".into(),
                password: "secret1".into(),
                full_name: "Ana".into(),
                church_name: "Graça Viva".into(),
                address: None,
                phone: None,
                plan_type: "premium".into(),
                cnpj: None,
                church_type: None,
                church_size: None,
            })
            .await
            .unwrap();

        Fixture {
            members: MemberService::new(auth, store.clone()),
            store,
            church_id: registered.church_id,
            pastor_id: registered.user_id,
        }
    }

    fn new_member(church_id: Uuid, email: &str, role: AppRole) -> CreateMemberPayload {
        CreateMemberPayload {
            email: email.into(),
            password: "secret1".into(),
            name: "Bruno".into(),
            phone: None,
            church_id,
            role,
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn second_pastor_is_rejected_without_writes() {
        let f = fixture().await;
        let before = f.store.snapshot();

        let err = f
            .members
            .create_member(
                f.church_id,
                &[AppRole::Pastor],
                new_member(f.church_id, "b@x.com", AppRole::Pastor),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicatePastor));

        let after = f.store.snapshot();
        assert_eq!(after.users.len(), before.users.len());
        assert_eq!(after.profiles.len(), before.profiles.len());
        assert_eq!(after.roles.len(), before.roles.len());
    }

    #[tokio::test]
    async fn grant_path_applies_the_same_pastor_rule() {
        let f = fixture().await;
        let member = f
            .members
            .create_member(
                f.church_id,
                &[AppRole::Pastor],
                new_member(f.church_id, "b@x.com", AppRole::Member),
            )
            .await
            .unwrap();

        let err = f
            .members
            .grant_role(f.church_id, member.profile.id, AppRole::Pastor)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicatePastor));
    }

    #[tokio::test]
    async fn leader_creation_marks_the_onboarding_flag() {
        let f = fixture().await;
        let member = f
            .members
            .create_member(
                f.church_id,
                &[AppRole::Pastor],
                new_member(f.church_id, "l@x.com", AppRole::Leader),
            )
            .await
            .unwrap();

        assert_eq!(member.roles, vec![AppRole::Leader]);
        assert_eq!(member.profile.church_id, Some(f.church_id));
        assert!(f.store.snapshot().onboardings[0].first_leader_added);
    }

    #[tokio::test]
    async fn only_pastor_or_leader_may_create() {
        let f = fixture().await;
        let err = f
            .members
            .create_member(
                f.church_id,
                &[AppRole::Minister, AppRole::Member],
                new_member(f.church_id, "m@x.com", AppRole::Member),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[tokio::test]
    async fn payload_church_must_match_the_tenant() {
        let f = fixture().await;
        let err = f
            .members
            .create_member(
                f.church_id,
                &[AppRole::Leader],
                new_member(Uuid::new_v4(), "m@x.com", AppRole::Member),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[tokio::test]
    async fn granting_a_role_twice_is_a_bad_request() {
        let f = fixture().await;
        let err = f
            .members
            .grant_role(f.church_id, f.pastor_id, AppRole::Pastor)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let grant = f
            .members
            .grant_role(f.church_id, f.pastor_id, AppRole::Leader)
            .await
            .unwrap();
        assert_eq!(grant.role, AppRole::Leader);
    }

    #[tokio::test]
    async fn grant_to_someone_outside_the_church_is_not_found() {
        let f = fixture().await;
        let err = f
            .members
            .grant_role(Uuid::new_v4(), f.pastor_id, AppRole::Member)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
