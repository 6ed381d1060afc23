//! # Users Module
//!
//! The user directory: profiles keyed by the identity provider's subject.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::User;
pub use routes::users_routes;
pub use services::UserService;
