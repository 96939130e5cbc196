// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register_church,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Church ---
        handlers::church::get_church,
        handlers::church::update_church,
        handlers::church::get_plan,
        handlers::church::get_onboarding,
        handlers::church::update_onboarding,
        handlers::church::list_stats,
        handlers::church::calculate_stats,

        // --- Members ---
        handlers::members::list_members,
        handlers::members::create_member,
        handlers::members::get_member,
        handlers::members::update_member,
        handlers::members::delete_member,
        handlers::members::grant_role,

        // --- Ministries ---
        handlers::ministries::list_ministries,
        handlers::ministries::create_ministry,
        handlers::ministries::update_ministry,
        handlers::ministries::delete_ministry,
        handlers::ministries::list_ministry_members,
        handlers::ministries::add_ministry_member,
        handlers::ministries::update_ministry_member,
        handlers::ministries::remove_ministry_member,
        handlers::ministries::list_ministry_roles,
        handlers::ministries::create_ministry_role,
        handlers::ministries::update_ministry_role,
        handlers::ministries::delete_ministry_role,

        // --- Worship ---
        handlers::worship::list_songs,
        handlers::worship::get_song,
        handlers::worship::create_song,
        handlers::worship::update_song,
        handlers::worship::delete_song,
        handlers::worship::list_worship_sets,
        handlers::worship::create_worship_set,
        handlers::worship::update_worship_set,
        handlers::worship::delete_worship_set,

        // --- Events ---
        handlers::events::list_events,
        handlers::events::create_event,
        handlers::events::update_event,
        handlers::events::delete_event,

        // --- Schedules ---
        handlers::schedules::list_event_schedules,
        handlers::schedules::create_schedule,
        handlers::schedules::check_conflicts,
        handlers::schedules::update_schedule,
        handlers::schedules::confirm_schedule,
        handlers::schedules::delete_schedule,
        handlers::schedules::list_my_schedules,

        // --- Attendance ---
        handlers::attendance::list_attendance,
        handlers::attendance::record_attendance,
        handlers::attendance::delete_attendance,

        // --- Announcements ---
        handlers::announcements::list_announcements,
        handlers::announcements::create_announcement,
        handlers::announcements::update_announcement,
        handlers::announcements::delete_announcement,
        handlers::announcements::record_view,

        // --- FINANCE ---
        handlers::finance::list_accounts,
        handlers::finance::create_account,
        handlers::finance::update_account,
        handlers::finance::delete_account,
        handlers::finance::list_categories,
        handlers::finance::create_category,
        handlers::finance::update_category,
        handlers::finance::delete_category,
        handlers::finance::list_contacts,
        handlers::finance::create_contact,
        handlers::finance::update_contact,
        handlers::finance::delete_contact,
        handlers::finance::list_cost_centers,
        handlers::finance::create_cost_center,
        handlers::finance::update_cost_center,
        handlers::finance::delete_cost_center,
        handlers::finance::list_transactions,
        handlers::finance::create_transaction,
        handlers::finance::update_transaction,
        handlers::finance::delete_transaction,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,

            // --- Church ---
            models::church::Church,
            models::church::ChurchSettings,
            models::church::PlanTier,
            models::church::ChurchPlan,
            models::church::Onboarding,
            models::church::RegisterChurchPayload,
            models::church::RegisterChurchResponse,
            models::church::UpdateChurchPayload,
            models::church::UpdateOnboardingPayload,
            models::church::ChurchStats,
            models::church::CalculateStatsPayload,

            // --- Members ---
            models::member::AppRole,
            models::member::ProfileStatus,
            models::member::Profile,
            models::member::RoleGrant,
            models::member::Member,
            models::member::MemberPage,
            models::member::CreateMemberPayload,
            models::member::CreateMemberResponse,
            models::member::UpdateMemberPayload,
            models::member::GrantRolePayload,

            // --- Ministries ---
            models::ministry::Ministry,
            models::ministry::CreateMinistryPayload,
            models::ministry::UpdateMinistryPayload,
            models::ministry::MinistryMember,
            models::ministry::AddMinistryMemberPayload,
            models::ministry::UpdateMinistryMemberPayload,
            models::ministry::MinistryRole,
            models::ministry::MinistryRolePayload,

            // --- Worship ---
            models::worship::Song,
            models::worship::CreateSongPayload,
            models::worship::UpdateSongPayload,
            models::worship::SetSong,
            models::worship::WorshipSet,
            models::worship::CreateWorshipSetPayload,
            models::worship::UpdateWorshipSetPayload,

            // --- Events ---
            models::event::Event,
            models::event::Schedule,
            models::event::ScheduleDetail,
            models::event::MySchedule,
            models::event::ScheduleConflict,
            models::event::Attendance,
            models::event::CreateEventPayload,
            models::event::UpdateEventPayload,
            models::event::CreateSchedulePayload,
            models::event::UpdateSchedulePayload,
            models::event::RecordAttendancePayload,

            // --- Announcements ---
            models::announcement::Announcement,
            models::announcement::AnnouncementView,
            models::announcement::CreateAnnouncementPayload,
            models::announcement::UpdateAnnouncementPayload,

            // --- FINANCE ---
            models::finance::TransactionType,
            models::finance::TransactionStatus,
            models::finance::PaymentType,
            models::finance::FinancialAccount,
            models::finance::FinancialCategory,
            models::finance::FinancialContact,
            models::finance::CostCenter,
            models::finance::FinancialTransaction,
            models::finance::AccountPayload,
            models::finance::CategoryPayload,
            models::finance::ContactPayload,
            models::finance::CostCenterPayload,
            models::finance::TransactionPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro de Igreja e Login"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Church", description = "Dados, Plano e Onboarding da Igreja"),
        (name = "Members", description = "Membros e Cargos"),
        (name = "Ministries", description = "Ministérios, Equipes e Funções"),
        (name = "Worship", description = "Músicas e Repertórios"),
        (name = "Events", description = "Agenda de Eventos"),
        (name = "Schedules", description = "Escalas e Conflitos de Horário"),
        (name = "Attendance", description = "Presença nos Eventos"),
        (name = "Announcements", description = "Mural de Avisos"),
        (name = "Finance", description = "Contas, Categorias, Contatos e Lançamentos")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tenant_path_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/register-church",
            "/api/members/{id}/roles",
            "/api/schedules/conflicts",
            "/api/finance/cost-centers/{id}",
            "/api/songs/{id}",
            "/api/worship-sets",
            "/api/ministries/{id}/members/{member_id}",
            "/api/ministries/{id}/roles",
            "/api/church/stats",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {}", path);
        }
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("api_jwt")));
    }
}
