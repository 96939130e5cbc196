pub mod store;
pub use store::{ChurchStore, ScheduleStore, UserStore};

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod church_repo;
pub use church_repo::ChurchRepository;
pub mod member_repo;
pub use member_repo::MemberRepository;
pub mod ministry_repo;
pub use ministry_repo::MinistryRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod announcement_repo;
pub use announcement_repo::AnnouncementRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod worship_repo;
pub use worship_repo::WorshipRepository;

#[cfg(test)]
pub mod memory;
