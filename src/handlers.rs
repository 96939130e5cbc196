pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod church;
pub mod events;
pub mod finance;
pub mod members;
pub mod ministries;
pub mod schedules;
pub mod worship;
