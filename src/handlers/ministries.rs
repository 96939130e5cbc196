// src/handlers/ministries.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PastorOrLeader, RequireRole},
        tenancy::TenantContext,
    },
    models::ministry::{
        AddMinistryMemberPayload, CreateMinistryPayload, Ministry, MinistryMember, MinistryRole,
        MinistryRolePayload, UpdateMinistryMemberPayload, UpdateMinistryPayload,
    },
};

// GET /api/ministries
#[utoipa::path(
    get,
    path = "/api/ministries",
    tag = "Ministries",
    responses((status = 200, description = "Ministérios da igreja", body = Vec<Ministry>)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn list_ministries(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let ministries = app_state
        .ministry_repo
        .list_ministries(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ministries)))
}

// POST /api/ministries
#[utoipa::path(
    post,
    path = "/api/ministries",
    tag = "Ministries",
    request_body = CreateMinistryPayload,
    responses((status = 201, description = "Ministério criado", body = Ministry)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_ministry(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<CreateMinistryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let ministry = app_state
        .ministry_repo
        .create_ministry(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ministry)))
}

// PUT /api/ministries/{id}
#[utoipa::path(
    put,
    path = "/api/ministries/{id}",
    tag = "Ministries",
    request_body = UpdateMinistryPayload,
    responses((status = 200, description = "Ministério atualizado", body = Ministry)),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ministry(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(ministry_id): Path<Uuid>,
    Json(payload): Json<UpdateMinistryPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let ministry = app_state
        .ministry_repo
        .update_ministry(tenant.0, ministry_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ministry)))
}

// DELETE /api/ministries/{id}
#[utoipa::path(
    delete,
    path = "/api/ministries/{id}",
    tag = "Ministries",
    responses((status = 204, description = "Ministério removido")),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_ministry(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(ministry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ministry_repo
        .delete_ministry(tenant.0, ministry_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// EQUIPE DO MINISTÉRIO
// ---

// GET /api/ministries/{id}/members
#[utoipa::path(
    get,
    path = "/api/ministries/{id}/members",
    tag = "Ministries",
    responses((status = 200, description = "Integrantes, entradas mais recentes primeiro", body = Vec<MinistryMember>)),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_ministry_members(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(ministry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let members = app_state
        .ministry_repo
        .list_ministry_members(tenant.0, ministry_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(members)))
}

// POST /api/ministries/{id}/members
#[utoipa::path(
    post,
    path = "/api/ministries/{id}/members",
    tag = "Ministries",
    request_body = AddMinistryMemberPayload,
    responses(
        (status = 201, description = "Pessoa adicionada ao ministério", body = MinistryMember),
        (status = 400, description = "Pessoa já faz parte do ministério"),
        (status = 404, description = "Ministério ou pessoa não pertence à igreja")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_ministry_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(ministry_id): Path<Uuid>,
    Json(payload): Json<AddMinistryMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state
        .ministry_repo
        .add_ministry_member(tenant.0, ministry_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(member)))
}

// PUT /api/ministries/{id}/members/{member_id}
#[utoipa::path(
    put,
    path = "/api/ministries/{id}/members/{member_id}",
    tag = "Ministries",
    request_body = UpdateMinistryMemberPayload,
    responses((status = 200, description = "Função do integrante atualizada", body = MinistryMember)),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("member_id" = Uuid, Path, description = "ID do vínculo"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ministry_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path((ministry_id, member_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMinistryMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .ministry_repo
        .update_ministry_member(tenant.0, ministry_id, member_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(member)))
}

// DELETE /api/ministries/{id}/members/{member_id}
#[utoipa::path(
    delete,
    path = "/api/ministries/{id}/members/{member_id}",
    tag = "Ministries",
    responses((status = 204, description = "Pessoa removida do ministério")),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("member_id" = Uuid, Path, description = "ID do vínculo"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_ministry_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path((ministry_id, member_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ministry_repo
        .remove_ministry_member(tenant.0, ministry_id, member_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// FUNÇÕES DO MINISTÉRIO
// ---

// GET /api/ministries/{id}/roles
#[utoipa::path(
    get,
    path = "/api/ministries/{id}/roles",
    tag = "Ministries",
    responses((status = 200, description = "Funções por nome", body = Vec<MinistryRole>)),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_ministry_roles(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(ministry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let roles = app_state
        .ministry_repo
        .list_ministry_roles(tenant.0, ministry_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(roles)))
}

// POST /api/ministries/{id}/roles
#[utoipa::path(
    post,
    path = "/api/ministries/{id}/roles",
    tag = "Ministries",
    request_body = MinistryRolePayload,
    responses(
        (status = 201, description = "Função criada", body = MinistryRole),
        (status = 404, description = "Ministério não pertence à igreja")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_ministry_role(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(ministry_id): Path<Uuid>,
    Json(payload): Json<MinistryRolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let role = app_state
        .ministry_repo
        .create_ministry_role(tenant.0, ministry_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(role)))
}

// PUT /api/ministries/{id}/roles/{role_id}
#[utoipa::path(
    put,
    path = "/api/ministries/{id}/roles/{role_id}",
    tag = "Ministries",
    request_body = MinistryRolePayload,
    responses((status = 200, description = "Função atualizada", body = MinistryRole)),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("role_id" = Uuid, Path, description = "ID da função"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ministry_role(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path((ministry_id, role_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<MinistryRolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let role = app_state
        .ministry_repo
        .update_ministry_role(tenant.0, ministry_id, role_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(role)))
}

// DELETE /api/ministries/{id}/roles/{role_id}
#[utoipa::path(
    delete,
    path = "/api/ministries/{id}/roles/{role_id}",
    tag = "Ministries",
    responses((status = 204, description = "Função removida")),
    params(
        ("id" = Uuid, Path, description = "ID do ministério"),
        ("role_id" = Uuid, Path, description = "ID da função"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_ministry_role(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path((ministry_id, role_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .ministry_repo
        .delete_ministry_role(tenant.0, ministry_id, role_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
