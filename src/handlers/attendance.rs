// src/handlers/attendance.rs

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
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{RequireRole, StaffRoles},
        tenancy::TenantContext,
    },
    models::event::{Attendance, RecordAttendancePayload},
};

// GET /api/events/{id}/attendance
#[utoipa::path(
    get,
    path = "/api/events/{id}/attendance",
    tag = "Attendance",
    responses((status = 200, description = "Presenças do evento", body = Vec<Attendance>)),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let records = app_state
        .event_repo
        .list_attendance(tenant.0, event_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(records)))
}

// POST /api/events/{id}/attendance
#[utoipa::path(
    post,
    path = "/api/events/{id}/attendance",
    tag = "Attendance",
    request_body = RecordAttendancePayload,
    responses((status = 200, description = "Presença registrada (ou sobrescrita)", body = Attendance)),
    params(
        ("id" = Uuid, Path, description = "ID do evento"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<StaffRoles>,
    Path(event_id): Path<Uuid>,
    Json(payload): Json<RecordAttendancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state
        .event_repo
        .record_attendance(tenant.0, event_id, user.id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(record)))
}

// DELETE /api/attendance/{id}
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    tag = "Attendance",
    responses((status = 204, description = "Registro de presença removido")),
    params(
        ("id" = Uuid, Path, description = "ID do registro"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<StaffRoles>,
    Path(attendance_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .event_repo
        .delete_attendance(tenant.0, attendance_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
