// src/middleware/tenancy.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{authenticate, AuthenticatedUser},
    models::member::{AppRole, ProfileStatus},
};

// O nome do nosso cabeçalho HTTP customizado
pub const CHURCH_ID_HEADER: &str = "x-church-id";

// A igreja em que a requisição opera
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub Uuid);

// Os cargos de quem chamou, carregados uma vez pelo guard
#[derive(Debug, Clone, Default)]
pub struct CallerRoles(pub Vec<AppRole>);

impl CallerRoles {
    pub fn has_any(&self, allowed: &[AppRole]) -> bool {
        self.0.iter().any(|r| allowed.contains(r))
    }
}

fn church_id_from(request: &Request) -> Result<Uuid, AppError> {
    let value = request
        .headers()
        .get(CHURCH_ID_HEADER)
        .ok_or_else(|| AppError::BadRequest("O cabeçalho X-Church-Id é obrigatório.".into()))?;

    let value_str = value.to_str().map_err(|_| {
        AppError::BadRequest("Cabeçalho X-Church-Id contém caracteres inválidos.".into())
    })?;

    Uuid::parse_str(value_str)
        .map_err(|_| AppError::BadRequest("Cabeçalho X-Church-Id inválido (não é um UUID).".into()))
}

/// Autentica, confere que o perfil ativo de quem chamou pertence à igreja do
/// cabeçalho e carrega os cargos.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&app_state, request.headers()).await?;
    let church_id = church_id_from(&request)?;

    let is_member = app_state
        .church_store
        .find_profile(user.id)
        .await?
        .is_some_and(|p| p.church_id == Some(church_id) && p.status == ProfileStatus::Active);

    if !is_member {
        tracing::warn!("Usuário {} sem acesso à igreja {}", user.id, church_id);
        return Err(AppError::PermissionDenied);
    }

    let roles = app_state.church_store.roles_for_user(user.id).await?;

    let extensions = request.extensions_mut();
    extensions.insert(AuthenticatedUser(user));
    extensions.insert(TenantContext(church_id));
    extensions.insert(CallerRoles(roles));

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .copied()
            .ok_or_else(|| AppError::BadRequest("Contexto da igreja não encontrado".into()))
    }
}

impl<S> FromRequestParts<S> for CallerRoles
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<CallerRoles>().cloned().unwrap_or_default())
    }
}
