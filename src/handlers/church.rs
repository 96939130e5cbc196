// src/handlers/church.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PastorOnly, PastorOrLeader, RequireRole},
        tenancy::TenantContext,
    },
    models::church::{
        CalculateStatsPayload, Church, ChurchPlan, ChurchStats, Onboarding, StatsFilters,
        UpdateChurchPayload, UpdateOnboardingPayload,
    },
};

// GET /api/church
#[utoipa::path(
    get,
    path = "/api/church",
    tag = "Church",
    responses(
        (status = 200, description = "Dados da igreja", body = Church),
        (status = 404, description = "Igreja não encontrada")
    ),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn get_church(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let church = app_state
        .church_store
        .find_church(tenant.0)
        .await
        .and_then(|c| c.ok_or(AppError::NotFound))
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(church)))
}

// PUT /api/church
#[utoipa::path(
    put,
    path = "/api/church",
    tag = "Church",
    request_body = UpdateChurchPayload,
    responses(
        (status = 200, description = "Igreja atualizada", body = Church),
        (status = 403, description = "Apenas o pastor")
    ),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn update_church(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOnly>,
    Json(payload): Json<UpdateChurchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let church = app_state
        .church_repo
        .update_church(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(church)))
}

// GET /api/church/plan
#[utoipa::path(
    get,
    path = "/api/church/plan",
    tag = "Church",
    responses((status = 200, description = "Plano e cotas", body = ChurchPlan)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn get_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let plan = app_state
        .church_repo
        .get_plan(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(plan)))
}

// GET /api/church/onboarding
#[utoipa::path(
    get,
    path = "/api/church/onboarding",
    tag = "Church",
    responses((status = 200, description = "Progresso do primeiro acesso", body = Onboarding)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn get_onboarding(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let onboarding = app_state
        .church_repo
        .get_onboarding(tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(onboarding)))
}

// PUT /api/church/onboarding
#[utoipa::path(
    put,
    path = "/api/church/onboarding",
    tag = "Church",
    request_body = UpdateOnboardingPayload,
    responses((status = 200, description = "Onboarding atualizado", body = Onboarding)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn update_onboarding(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOnly>,
    Json(payload): Json<UpdateOnboardingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let onboarding = app_state
        .church_repo
        .update_onboarding(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(onboarding)))
}

// GET /api/church/stats
#[utoipa::path(
    get,
    path = "/api/church/stats",
    tag = "Church",
    params(
        StatsFilters,
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    responses(
        (status = 200, description = "Estatísticas diárias, mais recentes primeiro", body = Vec<ChurchStats>),
        (status = 400, description = "Intervalo de datas invertido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Query(filters): Query<StatsFilters>,
) -> Result<impl IntoResponse, ApiError> {
    filters
        .check_range()
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let stats = app_state
        .church_repo
        .list_stats(tenant.0, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}

// POST /api/church/stats
#[utoipa::path(
    post,
    path = "/api/church/stats",
    tag = "Church",
    request_body = CalculateStatsPayload,
    responses((status = 200, description = "Números do dia consolidados", body = ChurchStats)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn calculate_stats(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<PastorOrLeader>,
    Json(payload): Json<CalculateStatsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let stat_date = payload.stat_date.unwrap_or_else(|| Utc::now().date_naive());

    let stats = app_state
        .church_repo
        .calculate_stats(tenant.0, stat_date)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}
