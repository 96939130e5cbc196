// src/handlers/worship.rs

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
        rbac::{RequireRole, StaffRoles},
        tenancy::TenantContext,
    },
    models::worship::{
        CreateSongPayload, CreateWorshipSetPayload, Song, SongFilters, UpdateSongPayload,
        UpdateWorshipSetPayload, WorshipSet, WorshipSetFilters,
    },
};

// ---
// MÚSICAS
// ---

// GET /api/songs
#[utoipa::path(
    get,
    path = "/api/songs",
    tag = "Worship",
    params(
        SongFilters,
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    responses((status = 200, description = "Biblioteca de músicas, por título", body = Vec<Song>)),
    security(("api_jwt" = []))
)]
pub async fn list_songs(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(filters): Query<SongFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let songs = app_state
        .worship_repo
        .list_songs(tenant.0, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(songs)))
}

// GET /api/songs/{id}
#[utoipa::path(
    get,
    path = "/api/songs/{id}",
    tag = "Worship",
    responses(
        (status = 200, description = "Música com letra e cifra", body = Song),
        (status = 404, description = "Música não pertence à igreja")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da música"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_song(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(song_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let song = app_state
        .worship_repo
        .find_song(tenant.0, song_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(song)))
}

// POST /api/songs
#[utoipa::path(
    post,
    path = "/api/songs",
    tag = "Worship",
    request_body = CreateSongPayload,
    responses((status = 201, description = "Música cadastrada", body = Song)),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_song(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<StaffRoles>,
    Json(payload): Json<CreateSongPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let song = app_state
        .worship_repo
        .create_song(tenant.0, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(song)))
}

// PUT /api/songs/{id}
#[utoipa::path(
    put,
    path = "/api/songs/{id}",
    tag = "Worship",
    request_body = UpdateSongPayload,
    responses((status = 200, description = "Música atualizada", body = Song)),
    params(
        ("id" = Uuid, Path, description = "ID da música"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_song(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<StaffRoles>,
    Path(song_id): Path<Uuid>,
    Json(payload): Json<UpdateSongPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let song = app_state
        .worship_repo
        .update_song(tenant.0, song_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(song)))
}

// DELETE /api/songs/{id}
#[utoipa::path(
    delete,
    path = "/api/songs/{id}",
    tag = "Worship",
    responses((status = 204, description = "Música removida")),
    params(
        ("id" = Uuid, Path, description = "ID da música"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_song(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<StaffRoles>,
    Path(song_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .worship_repo
        .delete_song(tenant.0, song_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// REPERTÓRIOS
// ---

// GET /api/worship-sets
#[utoipa::path(
    get,
    path = "/api/worship-sets",
    tag = "Worship",
    params(
        WorshipSetFilters,
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    responses((status = 200, description = "Repertórios, mais novos primeiro", body = Vec<WorshipSet>)),
    security(("api_jwt" = []))
)]
pub async fn list_worship_sets(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(filters): Query<WorshipSetFilters>,
) -> Result<impl IntoResponse, ApiError> {
    let sets = app_state
        .worship_repo
        .list_worship_sets(tenant.0, &filters)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sets)))
}

// POST /api/worship-sets
#[utoipa::path(
    post,
    path = "/api/worship-sets",
    tag = "Worship",
    request_body = CreateWorshipSetPayload,
    responses(
        (status = 201, description = "Repertório criado", body = WorshipSet),
        (status = 400, description = "Música de outra igreja no repertório"),
        (status = 404, description = "Evento não pertence à igreja")
    ),
    params(("x-church-id" = Uuid, Header, description = "ID da Igreja")),
    security(("api_jwt" = []))
)]
pub async fn create_worship_set(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<StaffRoles>,
    Json(payload): Json<CreateWorshipSetPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let set = app_state
        .worship_repo
        .create_worship_set(tenant.0, user.id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(set)))
}

// PUT /api/worship-sets/{id}
#[utoipa::path(
    put,
    path = "/api/worship-sets/{id}",
    tag = "Worship",
    request_body = UpdateWorshipSetPayload,
    responses((status = 200, description = "Repertório atualizado", body = WorshipSet)),
    params(
        ("id" = Uuid, Path, description = "ID do repertório"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_worship_set(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<StaffRoles>,
    Path(set_id): Path<Uuid>,
    Json(payload): Json<UpdateWorshipSetPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let set = app_state
        .worship_repo
        .update_worship_set(tenant.0, set_id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(set)))
}

// DELETE /api/worship-sets/{id}
#[utoipa::path(
    delete,
    path = "/api/worship-sets/{id}",
    tag = "Worship",
    responses((status = 204, description = "Repertório removido")),
    params(
        ("id" = Uuid, Path, description = "ID do repertório"),
        ("x-church-id" = Uuid, Header, description = "ID da Igreja")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_worship_set(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _guard: RequireRole<StaffRoles>,
    Path(set_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .worship_repo
        .delete_worship_set(tenant.0, set_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
