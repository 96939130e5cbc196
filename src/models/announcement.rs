// src/models/announcement.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub church_id: Uuid,
    pub ministry_id: Option<Uuid>,

    #[schema(example = "Retiro de Jovens")]
    pub title: String,

    pub content: String,

    #[schema(example = "EVENTO")]
    pub category: String,

    pub image_url: Option<String>,
    pub is_pinned: bool,
    pub is_public: bool,
    pub is_urgent: bool,
    pub target_profiles: Option<Vec<String>>,
    pub publish_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementView {
    pub id: Uuid,
    pub announcement_id: Uuid,
    pub user_id: Uuid,
    pub viewed_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    #[validate(length(min = 1, message = "O conteúdo é obrigatório."))]
    pub content: String,
    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,
    pub ministry_id: Option<Uuid>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub is_urgent: bool,
    pub target_profiles: Option<Vec<String>>,
    pub publish_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub ministry_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub is_pinned: Option<bool>,
    pub is_public: Option<bool>,
    pub is_urgent: Option<bool>,
    pub publish_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AnnouncementFilters {
    pub category: Option<String>,
    pub ministry_id: Option<Uuid>,
}
