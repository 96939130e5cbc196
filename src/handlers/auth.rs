// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::{AuthResponse, LoginUserPayload, MeResponse},
        church::{RegisterChurchPayload, RegisterChurchResponse},
    },
};

// POST /api/auth/register-church
#[utoipa::path(
    post,
    path = "/api/auth/register-church",
    tag = "Auth",
    request_body = RegisterChurchPayload,
    responses(
        (status = 200, description = "Igreja, pastor, plano, ministérios e onboarding criados", body = RegisterChurchResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 500, description = "Falha em uma das etapas; a mensagem vem do banco")
    )
)]
pub async fn register_church(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterChurchPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // Qualquer falha do cadastro sai como 500, com a mensagem da etapa que falhou
    let registered = app_state
        .registration_service
        .register_church(payload)
        .await
        .map_err(|app_err| {
            app_err
                .to_api_error(&locale, &app_state.i18n_store)
                .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        })?;

    Ok((
        StatusCode::OK,
        Json(RegisterChurchResponse {
            success: true,
            message: "Igreja cadastrada com sucesso!".to_string(),
            church_id: registered.church_id,
            user_id: registered.user_id,
        }),
    ))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "E-mail ou senha inválidos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(AuthResponse { token })))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário, perfil e cargos", body = MeResponse),
        (status = 401, description = "Token inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let profile = app_state.church_store.find_profile(user.id).await.map_err(to_api)?;
    let roles = app_state.church_store.roles_for_user(user.id).await.map_err(to_api)?;

    Ok(Json(MeResponse { user, profile, roles }))
}
