// src/handlers/events.rs

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
    models::event::{CreateEventPayload, Event, EventFilters, UpdateEventPayload},
};

// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(
        EventFilters,
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    responses((status = 200, description = "Eventos por data", body = Vec<Event>)),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(filters): Query<EventFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let events = app_state
        .event_repo
        .list_events(tenant.0, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(events)))
}

// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventPayload,
    responses((status = 201, description = "Evento criado", body = Event)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let event = app_state
        .event_repo
        .create_event(tenant.0, user.id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(event)))
}

// PUT /api/events/{id}
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    request_body = UpdateEventPayload,
    responses((status = 200, description = "Evento atualizado", body = Event)),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<UpdateEventPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let event = app_state
        .event_repo
        .update_event(tenant.0, event_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(event)))
}

// DELETE /api/events/{id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    responses((status = 204, description = "Evento removido, com escalas e presenças")),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .event_repo
        .delete_event(tenant.0, event_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
