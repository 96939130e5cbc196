pub mod announcement;
pub mod auth;
pub mod church;
pub mod event;
pub mod finance;
pub mod member;
pub mod ministry;
pub mod worship;
