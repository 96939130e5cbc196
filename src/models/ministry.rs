// src/models/ministry.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ministry {
    pub id: Uuid,
    pub church_id: Uuid,

    // Preenchido apenas nos ministérios do catálogo inicial
    #[schema(example = "louvor")]
    pub internal_id: Option<String>,

    #[schema(example = "Louvor")]
    pub name: String,

    pub description: Option<String>,

    #[schema(example = "Music")]
    pub icon: Option<String>,

    #[schema(example = "#FF5733")]
    pub color: Option<String>,

    pub features: Vec<String>,
    pub leader_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entrada do catálogo fixo semeado em toda igreja nova.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinistryTemplate {
    pub internal_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub features: &'static [&'static str],
}

pub const PREDEFINED_MINISTRIES: [MinistryTemplate; 7] = [
    MinistryTemplate {
        internal_id: "louvor",
        name: "Louvor",
        description: "Ministério de louvor e adoração",
        icon: "Music",
        color: "#FF5733",
        features: &["biblioteca_musicas", "sets_louvor", "escalas"],
    },
    MinistryTemplate {
        internal_id: "midia",
        name: "Mídia",
        description: "Gestão de fotos e vídeos",
        icon: "Video",
        color: "#33FF57",
        features: &["galeria_midia", "upload", "compartilhamento"],
    },
    MinistryTemplate {
        internal_id: "intercession",
        name: "Intercessão",
        description: "Ministério de oração e intercessão",
        icon: "Heart",
        color: "#3357FF",
        features: &["pedidos_oracao", "calendario_oracao"],
    },
    MinistryTemplate {
        internal_id: "diaconia",
        name: "Diaconia",
        description: "Ministério de assistência social",
        icon: "Users",
        color: "#FF33F5",
        features: &["beneficiarios", "donativos"],
    },
    MinistryTemplate {
        internal_id: "evangelismo",
        name: "Evangelismo",
        description: "Ministério de evangelização",
        icon: "Zap",
        color: "#F5FF33",
        features: &["visitantes", "acompanhamento"],
    },
    MinistryTemplate {
        internal_id: "estudo",
        name: "Estudo Bíblico",
        description: "Ministério de ensino e estudo",
        icon: "Book",
        color: "#33FFF5",
        features: &["aulas", "materiais"],
    },
    MinistryTemplate {
        internal_id: "comunicacao",
        name: "Comunicação",
        description: "Ministério de comunicação",
        icon: "Megaphone",
        color: "#FF8C33",
        features: &["avisos", "redes_sociais"],
    },
];

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMinistryPayload {
    #[validate(length(min = 1, message = "O nome do ministério é obrigatório."))]
    #[schema(example = "Jovens")]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub leader_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMinistryPayload {
    #[validate(length(min = 1, message = "O nome do ministério é obrigatório."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub features: Option<Vec<String>>,
    pub leader_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

// --- Equipe do ministério ---

// Integrante com nome e foto do perfil
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MinistryMember {
    pub id: Uuid,
    pub ministry_id: Uuid,
    pub user_id: Uuid,

    #[schema(example = "MEMBER")]
    pub role: Option<String>,

    pub joined_at: DateTime<Utc>,
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMinistryMemberPayload {
    pub user_id: Uuid,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMinistryMemberPayload {
    #[validate(length(min = 1, message = "A função não pode ser vazia."))]
    pub role: String,
}

/// Função que o ministério usa nas escalas (ex.: "Baterista").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MinistryRole {
    pub id: Uuid,
    pub ministry_id: Uuid,

    #[schema(example = "Baterista")]
    pub role_name: String,

    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MinistryRolePayload {
    #[validate(length(min = 1, message = "O nome da função é obrigatório."))]
    pub role_name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_seven_distinct_internal_ids() {
        let ids: HashSet<_> = PREDEFINED_MINISTRIES.iter().map(|m| m.internal_id).collect();
        assert_eq!(ids.len(), 7);
        for expected in [
            "louvor",
            "midia",
            "intercession",
            "diaconia",
            "evangelismo",
            "estudo",
            "comunicacao",
        ] {
            assert!(ids.contains(expected), "faltando {expected}");
        }
    }
}
