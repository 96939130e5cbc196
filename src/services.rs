pub mod auth;
pub mod member_service;
pub mod registration_service;
pub mod schedule_service;

pub use auth::AuthService;
pub use member_service::MemberService;
pub use registration_service::RegistrationService;
pub use schedule_service::ScheduleService;
