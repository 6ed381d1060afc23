//! # Notifications Module
//!
//! Polled, append-only notices about ride and request status changes.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use models::{NewNotification, NotificationKind};
pub use routes::notifications_routes;
pub use services::NotificationService;
