//! Application services.

pub mod admin_bootstrap;
pub mod auth;
pub mod events;
pub mod fcm;
pub mod upload;
