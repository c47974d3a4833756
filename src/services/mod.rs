pub mod announcements;
pub mod auth;
pub mod client;
pub mod community;
pub mod debounce;
pub mod diagnosis;
pub mod diary;
pub mod plants;
pub mod polling;
pub mod validation;
