// src/handlers/announcements.rs

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
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PastorOrLeader, RequireRole},
        tenancy::TenantContext,
    },
    models::announcement::{
        Announcement, AnnouncementFilters, AnnouncementView, CreateAnnouncementPayload,
        UpdateAnnouncementPayload,
    },
};

// GET /api/announcements
#[utoipa::path(
    get,
    path = "/api/announcements",
    tag = "Announcements",
    params(
        AnnouncementFilters,
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    responses((status = 200, description = "Avisos, fixados primeiro", body = Vec<Announcement>)),
    security(("api_jwt" = []))
)]
pub async fn list_announcements(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(filters): Query<AnnouncementFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let announcements = app_state
        .announcement_repo
        .list_announcements(tenant.0, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(announcements)))
}

// POST /api/announcements
#[utoipa::path(
    post,
    path = "/api/announcements",
    tag = "Announcements",
    request_body = CreateAnnouncementPayload,
    responses((status = 201, description = "Aviso publicado", body = Announcement)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_announcement(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<CreateAnnouncementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let announcement = app_state
        .announcement_repo
        .create_announcement(tenant.0, user.id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(announcement)))
}

// PUT /api/announcements/{id}
#[utoipa::path(
    put,
    path = "/api/announcements/{id}",
    tag = "Announcements",
    request_body = UpdateAnnouncementPayload,
    responses((status = 200, description = "Aviso atualizado", body = Announcement)),
    params(
        ("id" = Uuid, Path, description = "ID do aviso"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_announcement(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(announcement_id): Path<Uuid>,
    Json(payload): Json<UpdateAnnouncementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let announcement = app_state
        .announcement_repo
        .update_announcement(tenant.0, announcement_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(announcement)))
}

// DELETE /api/announcements/{id}
#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    tag = "Announcements",
    responses((status = 204, description = "Aviso removido")),
    params(
        ("id" = Uuid, Path, description = "ID do aviso"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_announcement(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(announcement_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .announcement_repo
        .delete_announcement(tenant.0, announcement_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/announcements/{id}/views
#[utoipa::path(
    post,
    path = "/api/announcements/{id}/views",
    tag = "Announcements",
    responses((status = 200, description = "Leitura registrada", body = AnnouncementView)),
    params(
        ("id" = Uuid, Path, description = "ID do aviso"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_view(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(announcement_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .announcement_repo
        .record_view(tenant.0, announcement_id, user.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}
