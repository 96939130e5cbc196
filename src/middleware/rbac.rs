// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::tenancy::CallerRoles,
    models::member::AppRole,
};

/// Conjunto de cargos que libera uma ação.
pub trait RoleGate: Send + Sync + 'static {
    fn allowed() -> &'static [AppRole];
}

/// Guardião por cargo. Depende do `tenant_guard` já ter carregado os `CallerRoles`.
pub struct RequireRole<G>(pub PhantomData<G>);

impl<G, S> FromRequestParts<S> for RequireRole<G>
where
    G: RoleGate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let roles = parts.extensions.get::<CallerRoles>().cloned().unwrap_or_default();

        if !roles.has_any(G::allowed()) {
            return Err(AppError::PermissionDenied);
        }
        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PORTÕES (TIPOS)
// ---

pub struct PastorOnly;
impl RoleGate for PastorOnly {
    fn allowed() -> &'static [AppRole] {
        &[AppRole::Pastor]
    }
}

pub struct PastorOrLeader;
impl RoleGate for PastorOrLeader {
    fn allowed() -> &'static [AppRole] {
        &[AppRole::Pastor, AppRole::Leader]
    }
}

// Quem pode lançar presença
pub struct StaffRoles;
impl RoleGate for StaffRoles {
    fn allowed() -> &'static [AppRole] {
        &[AppRole::Pastor, AppRole::Leader, AppRole::Minister]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(roles: Vec<AppRole>) -> Parts {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        parts.extensions.insert(CallerRoles(roles));
        parts
    }

    #[tokio::test]
    async fn leader_passes_the_leader_gate_but_not_the_pastor_gate() {
        let mut parts = parts_with(vec![AppRole::Leader]);
        assert!(RequireRole::<PastorOrLeader>::from_request_parts(&mut parts, &()).await.is_ok());

        let err = RequireRole::<PastorOnly>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::PermissionDenied));
    }

    #[tokio::test]
    async fn minister_only_passes_the_staff_gate() {
        let mut parts = parts_with(vec![AppRole::Minister, AppRole::Member]);
        assert!(RequireRole::<StaffRoles>::from_request_parts(&mut parts, &()).await.is_ok());
        assert!(RequireRole::<PastorOrLeader>::from_request_parts(&mut parts, &()).await.is_err());
    }

    #[tokio::test]
    async fn missing_roles_are_denied() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(RequireRole::<StaffRoles>::from_request_parts(&mut parts, &()).await.is_err());
    }
}
