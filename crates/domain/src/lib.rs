//! Domain layer for the e-book library backend.
//!
//! This crate contains:
//! - Domain models (User, Book, UserBook)
//! - Domain events (new-book notifications)
//! - Business service traits (push notifications)

pub mod events;
pub mod models;
pub mod services;
