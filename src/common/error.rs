use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As variantes de etapa (TenantCreateError, ...) guardam a mensagem original do banco,
// que é repassada ao cliente sem alteração.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Erro de autenticação: {0}")]
    DuplicateIdentity(String),

    #[error("Erro ao criar a igreja: {0}")]
    TenantCreateError(String),

    #[error("Erro ao criar o perfil: {0}")]
    ProfileCreateError(String),

    #[error("Erro ao atribuir o cargo: {0}")]
    RoleGrantError(String),

    #[error("Erro ao criar o plano: {0}")]
    PlanCreateError(String),

    #[error("Erro ao criar os ministérios: {0}")]
    MinistrySeedError(String),

    #[error("Erro ao criar o onboarding: {0}")]
    OnboardingCreateError(String),

    #[error("Já existe um Pastor cadastrado nesta igreja")]
    DuplicatePastor,

    #[error("Conflito de horário com o evento {event_id} ({event_title}) como {role}")]
    SchedulingConflict {
        event_id: Uuid,
        event_title: String,
        role: String,
    },

    #[error("Permissão negada")]
    PermissionDenied,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Registro não encontrado")]
    NotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateIdentity(_)
            | AppError::DuplicatePastor
            | AppError::SchedulingConflict { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Chave da mensagem no catálogo de traduções.
    pub fn key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::BadRequest(_) => "bad_request",
            AppError::DuplicateIdentity(_) => "duplicate_identity",
            AppError::TenantCreateError(_) => "tenant_create",
            AppError::ProfileCreateError(_) => "profile_create",
            AppError::RoleGrantError(_) => "role_grant",
            AppError::PlanCreateError(_) => "plan_create",
            AppError::MinistrySeedError(_) => "ministry_seed",
            AppError::OnboardingCreateError(_) => "onboarding_create",
            AppError::DuplicatePastor => "duplicate_pastor",
            AppError::SchedulingConflict { .. } => "scheduling_conflict",
            AppError::PermissionDenied => "permission_denied",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::NotFound => "not_found",
            _ => "internal",
        }
    }

    fn args(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::BadRequest(detail)
            | AppError::DuplicateIdentity(detail)
            | AppError::TenantCreateError(detail)
            | AppError::ProfileCreateError(detail)
            | AppError::RoleGrantError(detail)
            | AppError::PlanCreateError(detail)
            | AppError::MinistrySeedError(detail)
            | AppError::OnboardingCreateError(detail) => vec![("detail", detail.clone())],
            AppError::SchedulingConflict { event_title, role, .. } => vec![
                ("title", event_title.clone()),
                ("role", role.clone()),
            ],
            _ => Vec::new(),
        }
    }

    /// Converte o erro de domínio no erro de wire, já traduzido para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        if status.is_server_error() && !self.is_step_failure() {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::SchedulingConflict { event_id, .. } => {
                Some(json!({ "conflictEventId": event_id }))
            }
            _ => None,
        };

        ApiError {
            status,
            error: store.translate(&locale.0, self.key(), &self.args()),
            details,
        }
    }

    /// Falhas de uma etapa do cadastro de igreja (já registradas pelo serviço).
    pub fn is_step_failure(&self) -> bool {
        matches!(
            self,
            AppError::TenantCreateError(_)
                | AppError::ProfileCreateError(_)
                | AppError::RoleGrantError(_)
                | AppError::PlanCreateError(_)
                | AppError::MinistrySeedError(_)
                | AppError::OnboardingCreateError(_)
        )
    }
}

// O erro que vai para o cliente. Sempre no envelope `{ success: false, error }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.error,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::global())
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_the_taxonomy() {
        assert_eq!(AppError::DuplicatePastor.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::PlanCreateError("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::DuplicateIdentity("x".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn step_failure_keeps_the_store_message() {
        let err = AppError::TenantCreateError("violates check constraint".into());
        let api = err.to_api_error(&Locale("pt".into()), I18nStore::global());
        assert!(api.error.contains("violates check constraint"));
    }

    #[test]
    fn conflict_names_event_and_role() {
        let err = AppError::SchedulingConflict {
            event_id: Uuid::new_v4(),
            event_title: "Culto de Domingo".into(),
            role: "Baterista".into(),
        };
        let api = err.to_api_error(&Locale("en".into()), I18nStore::global());
        assert!(api.error.contains("Culto de Domingo"));
        assert!(api.error.contains("Baterista"));
        assert!(api.details.is_some());
    }
}
