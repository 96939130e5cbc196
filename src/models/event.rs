// src/models/event.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// ---
// 1. Evento (culto, ensaio, reunião)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub church_id: Uuid,

    #[schema(example = "Culto de Domingo")]
    pub title: String,

    pub description: Option<String>,
    pub event_date: DateTime<Utc>,

    #[schema(example = "CULTO")]
    pub event_type: String,

    #[schema(example = "SCHEDULED")]
    pub status: String,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Escala (pessoa + ministério + função num evento)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: Uuid,
    pub event_id: Uuid,
    pub ministry_id: Uuid,
    pub user_id: Uuid,

    #[schema(example = "Baterista")]
    pub role: String,

    pub confirmed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Escala com os nomes para exibição
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub schedule: Schedule,
    pub profile_name: String,
    pub profile_phone: Option<String>,
    pub ministry_name: String,
    pub ministry_color: Option<String>,
}

// "Minhas escalas": a escala com os dados do evento
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MySchedule {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub schedule: Schedule,
    pub event_title: String,
    pub event_date: DateTime<Utc>,
    pub event_type: String,
    pub event_status: String,
    pub ministry_name: String,
}

/// Outra escala da mesma pessoa num evento com exatamente o mesmo horário.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConflict {
    pub conflict_event_id: Uuid,
    pub conflict_event_title: String,
    pub conflict_event_date: DateTime<Utc>,
    pub conflict_role: String,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub event_id: Uuid,
    pub ministry_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub notes: Option<String>,
}

// ---
// 3. Presença
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,

    #[schema(example = "PRESENT")]
    pub status: String,

    pub notes: Option<String>,
    pub recorded_by: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "O tipo do evento é obrigatório."))]
    pub event_type: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
    pub event_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventFilters {
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchedulePayload {
    pub event_id: Uuid,
    pub ministry_id: Uuid,
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "A função é obrigatória."))]
    pub role: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSchedulePayload {
    #[validate(length(min = 1, message = "A função é obrigatória."))]
    pub role: Option<String>,
    pub confirmed: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConflictQuery {
    pub user_id: Uuid,
    pub event_date: DateTime<Utc>,
    pub exclude_event_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttendancePayload {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "O status é obrigatório."))]
    #[schema(example = "PRESENT")]
    pub status: String,
    pub notes: Option<String>,
}
