// src/handlers/schedules.rs

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
    models::event::{
        ConflictQuery, CreateSchedulePayload, MySchedule, Schedule, ScheduleConflict,
        ScheduleDetail, UpdateSchedulePayload,
    },
};

// GET /api/events/{id}/schedules
#[utoipa::path(
    get,
    path = "/api/events/{id}/schedules",
    tag = "Schedules",
    responses((status = 200, description = "Escala do evento", body = Vec<ScheduleDetail>)),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_event_schedules(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app_state
        .event_repo
        .list_event_schedules(tenant.0, event_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(schedules)))
}

// POST /api/schedules
#[utoipa::path(
    post,
    path = "/api/schedules",
    tag = "Schedules",
    request_body = CreateSchedulePayload,
    responses(
        (status = 201, description = "Pessoa escalada", body = Schedule),
        (status = 409, description = "A pessoa já está escalada em outro evento no mesmo horário")
    ),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<CreateSchedulePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let schedule = app_state
        .schedule_service
        .assign(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

// GET /api/schedules/conflicts
#[utoipa::path(
    get,
    path = "/api/schedules/conflicts",
    tag = "Schedules",
    params(
        ConflictQuery,
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    responses(
        (status = 200, description = "Escalas no mesmo horário", body = Vec<ScheduleConflict>),
        (status = 404, description = "Pessoa não pertence à igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn check_conflicts(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(query): Query<ConflictQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let conflicts = app_state
        .schedule_service
        .check_conflicts(tenant.0, query.user_id, query.event_date, query.exclude_event_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(conflicts)))
}

// PUT /api/schedules/{id}
#[utoipa::path(
    put,
    path = "/api/schedules/{id}",
    tag = "Schedules",
    request_body = UpdateSchedulePayload,
    responses((status = 200, description = "Escala atualizada", body = Schedule)),
    params(
        ("id" = Uuid, Path, description = "ID da escala"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(schedule_id): Path<Uuid>,
    Json(payload): Json<UpdateSchedulePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let schedule = app_state
        .event_repo
        .update_schedule(tenant.0, schedule_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(schedule)))
}

// POST /api/schedules/{id}/confirm
#[utoipa::path(
    post,
    path = "/api/schedules/{id}/confirm",
    tag = "Schedules",
    responses(
        (status = 200, description = "Presença na escala confirmada", body = Schedule),
        (status = 404, description = "Escala inexistente ou de outra pessoa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da escala"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let schedule = app_state
        .event_repo
        .confirm_schedule(tenant.0, schedule_id, user.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(schedule)))
}

// DELETE /api/schedules/{id}
#[utoipa::path(
    delete,
    path = "/api/schedules/{id}",
    tag = "Schedules",
    responses((status = 204, description = "Escala removida")),
    params(
        ("id" = Uuid, Path, description = "ID da escala"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_schedule(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Path(schedule_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .event_repo
        .delete_schedule(tenant.0, schedule_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/schedules/mine
#[utoipa::path(
    get,
    path = "/api/schedules/mine",
    tag = "Schedules",
    responses((status = 200, description = "Próximas escalas de quem chamou (até 10)", body = Vec<MySchedule>)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn list_my_schedules(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let schedules = app_state
        .event_repo
        .list_my_schedules(tenant.0, user.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(schedules)))
}
