//! Sikjipsa plant-care client
//!
//! Async client for the Sikjipsa backend: AI plant diagnosis with bounded,
//! cancellable result polling, the plant encyclopedia, the community board,
//! growth diaries, announcements and social sign-in.

pub mod app_state;
pub mod config;
pub mod models;
pub mod services;
pub mod session;
