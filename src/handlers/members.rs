// src/handlers/members.rs

use axum::{
    extract::{Path, Query, State},
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
        rbac::{PastorOnly, PastorOrLeader, RequireRole},
        tenancy::{CallerRoles, TenantContext},
    },
    models::member::{
        CreateMemberPayload, CreateMemberResponse, GrantRolePayload, Member, MemberFilters, MemberPage,
        Profile, RoleGrant, UpdateMemberPayload,
    },
};

// GET /api/members
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Members",
    params(
        MemberFilters,
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    responses((status = 200, description = "Página de membros", body = MemberPage)),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(filters): Query<MemberFilters>,
) -> Result<impl IntoResponse, ApiError> {
    filters
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let page = app_state
        .member_repo
        .list_members(tenant.0, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(page)))
}

// POST /api/members
#[utoipa::path(
    post,
    path = "/api/members",
    tag = "Members",
    request_body = CreateMemberPayload,
    responses(
        (status = 201, description = "Membro cadastrado com login próprio", body = CreateMemberResponse),
        (status = 403, description = "Apenas pastor ou líder"),
        (status = 409, description = "E-mail já usado ou pastor já existente")
    ),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    roles: CallerRoles,
    Json(payload): Json<CreateMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let member = app_state
        .member_service
        .create_member(tenant.0, &roles.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateMemberResponse {
            success: true,
            message: "Membro cadastrado com sucesso!".to_string(),
            user: member,
        }),
    ))
}

// GET /api/members/{id}
#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "Members",
    responses(
        (status = 200, description = "Membro com e-mail e cargos", body = Member),
        (status = 404, description = "Membro não pertence à igreja")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let member = app_state
        .member_repo
        .find_member(tenant.0, member_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(member)))
}

// PUT /api/members/{id}
#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "Members",
    request_body = UpdateMemberPayload,
    responses((status = 200, description = "Perfil atualizado", body = Profile)),
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<UpdateMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let profile = app_state
        .member_repo
        .update_member(tenant.0, member_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profile)))
}

// DELETE /api/members/{id}
#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "Members",
    responses((status = 200, description = "Membro inativado", body = Profile)),
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_member(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOnly>,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = app_state
        .member_repo
        .deactivate_member(tenant.0, member_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(profile)))
}

// POST /api/members/{id}/roles
#[utoipa::path(
    post,
    path = "/api/members/{id}/roles",
    tag = "Members",
    request_body = GrantRolePayload,
    responses(
        (status = 201, description = "Cargo concedido", body = RoleGrant),
        (status = 409, description = "A igreja já tem pastor")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do membro"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn grant_role(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOnly>,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<GrantRolePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let grant = app_state
        .member_service
        .grant_role(tenant.0, member_id, payload.role)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(grant)))
}
