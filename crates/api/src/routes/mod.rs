//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod books;
pub mod files;
pub mod health;
pub mod notifications;
pub mod uploads;
pub mod ws;
