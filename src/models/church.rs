// src/models/church.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use rust_decimal::Decimal;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// ---
// 1. Church (o Tenant)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Church {
    pub id: Uuid,

    #[schema(example = "Igreja Graça Viva")]
    pub name: String,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,

    #[schema(value_type = ChurchSettings)]
    pub settings: Json<ChurchSettings>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Configurações desnormalizadas, gravadas como JSONB
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChurchSettings {
    #[schema(example = "12.345.678/0001-99")]
    pub cnpj: Option<String>,
    #[schema(example = "evangelica")]
    pub church_type: Option<String>,
    #[schema(example = "50-200")]
    pub church_size: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewChurch {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub settings: ChurchSettings,
}

// ---
// 2. Plano de assinatura
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Freemium,
    Premium,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanQuotas {
    pub max_leaders: i32,
    pub max_members: i32,
    pub features: &'static [&'static str],
}

impl PlanTier {
    /// Valor desconhecido (ou ausente) cai no freemium.
    pub fn from_plan_type(plan_type: &str) -> Self {
        match plan_type {
            "premium" => PlanTier::Premium,
            "enterprise" => PlanTier::Enterprise,
            _ => PlanTier::Freemium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Freemium => "freemium",
            PlanTier::Premium => "premium",
            PlanTier::Enterprise => "enterprise",
        }
    }

    pub fn quotas(&self) -> PlanQuotas {
        match self {
            PlanTier::Freemium => PlanQuotas {
                max_leaders: 1,
                max_members: 100,
                features: &["basic_dashboard", "member_management"],
            },
            PlanTier::Premium => PlanQuotas {
                max_leaders: 5,
                max_members: 500,
                features: &["basic_dashboard", "member_management", "financial_module", "events"],
            },
            PlanTier::Enterprise => PlanQuotas {
                max_leaders: 999,
                max_members: 9999,
                features: &["all_features"],
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChurchPlan {
    pub id: Uuid,
    pub church_id: Uuid,

    #[schema(example = "premium")]
    pub plan_type: String,

    #[schema(example = 5)]
    pub max_leaders: i32,

    #[schema(example = 500)]
    pub max_members: i32,

    pub features: Vec<String>,

    #[schema(example = "active")]
    pub status: String,

    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Onboarding (checklist do primeiro acesso)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Onboarding {
    pub id: Uuid,
    pub church_id: Uuid,
    pub step: i32,
    pub ministries_customized: bool,
    pub first_leader_added: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 4. Estatísticas (uma linha por igreja e dia)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChurchStats {
    pub id: Uuid,
    pub church_id: Uuid,
    pub stat_date: NaiveDate,
    pub total_members: i32,
    pub active_members: i32,
    pub new_members: i32,
    pub events_count: i32,

    #[schema(example = "42.50")]
    pub average_attendance: Decimal,

    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

// Formato de wire do cadastro: { email, password, fullName, churchName, ... }
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterChurchPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "p@x.com")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    #[schema(example = "Ana")]
    pub full_name: String,

    #[validate(length(min = 1, message = "O nome da igreja é obrigatório."))]
    #[schema(example = "Graça Viva")]
    pub church_name: String,

    #[schema(example = "Rua 1")]
    pub address: Option<String>,

    #[schema(example = "11999990000")]
    pub phone: Option<String>,

    // Texto livre: valores fora da tabela de planos viram freemium
    #[serde(default)]
    #[schema(example = "premium")]
    pub plan_type: String,

    pub cnpj: Option<String>,
    pub church_type: Option<String>,
    pub church_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredChurch {
    pub church_id: Uuid,
    pub user_id: Uuid,
}

// Formato de wire da resposta: { success, message, church_id, user_id }
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterChurchResponse {
    pub success: bool,
    pub message: String,
    pub church_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChurchPayload {
    #[validate(length(min = 1, message = "O nome da igreja é obrigatório."))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub settings: Option<ChurchSettings>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOnboardingPayload {
    #[validate(range(min = 1, message = "O passo começa em 1."))]
    pub step: Option<i32>,
    pub ministries_customized: Option<bool>,
    pub first_leader_added: Option<bool>,
    /// `true` marca o onboarding como concluído agora
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StatsFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl StatsFilters {
    pub fn check_range(&self) -> Result<(), AppError> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => Err(AppError::BadRequest(
                "A data inicial é posterior à data final.".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculateStatsPayload {
    /// Dia a consolidar; sem ele, hoje (UTC)
    pub stat_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_table_matches_the_tiers() {
        let premium = PlanTier::from_plan_type("premium").quotas();
        assert_eq!((premium.max_leaders, premium.max_members), (5, 500));
        assert_eq!(
            premium.features,
            &["basic_dashboard", "member_management", "financial_module", "events"]
        );

        let enterprise = PlanTier::from_plan_type("enterprise").quotas();
        assert_eq!((enterprise.max_leaders, enterprise.max_members), (999, 9999));
        assert_eq!(enterprise.features, &["all_features"]);
    }

    #[test]
    fn unknown_plan_type_falls_back_to_freemium() {
        for raw in ["", "gold", "PREMIUM", "free"] {
            assert_eq!(PlanTier::from_plan_type(raw), PlanTier::Freemium);
        }
        let quotas = PlanTier::Freemium.quotas();
        assert_eq!((quotas.max_leaders, quotas.max_members), (1, 100));
    }

    #[test]
    fn registration_payload_uses_camel_case() {
        let payload: RegisterChurchPayload = serde_json::from_value(serde_json::json!({
            "email": "p@x.com",
            "password": "secret1",
            "fullName": "Ana",
            "churchName": "Graça Viva",
            "address": "Rua 1",
            "phone": "11999990000",
            "planType": "premium"
        }))
        .unwrap();
        assert_eq!(payload.full_name, "Ana");
        assert_eq!(payload.plan_type, "premium");
        assert!(payload.cnpj.is_none());
    }

    #[test]
    fn stats_range_must_not_be_inverted() {
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        let inverted = StatsFilters { start_date: Some(day(10)), end_date: Some(day(1)) };
        assert!(inverted.check_range().is_err());

        let open = StatsFilters { start_date: Some(day(10)), end_date: None };
        assert!(open.check_range().is_ok());
        let same_day = StatsFilters { start_date: Some(day(5)), end_date: Some(day(5)) };
        assert!(same_day.check_range().is_ok());
    }
}
