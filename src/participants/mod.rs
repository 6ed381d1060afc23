//! # Participants Module
//!
//! Confirmed seat holders. Every change to the roster moves the ride's
//! `seats_filled` counter in the same transaction.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use routes::participants_routes;
pub use services::ParticipantService;
