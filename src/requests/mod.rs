//! # Requests Module
//!
//! Join-request state machine: `pending -> approved | revoked`, with a
//! resubmission cooldown after revocation and same-day exclusivity against
//! leading a ride.

pub mod cooldown;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use models::{JoinRequest, RequestStatus};
pub use routes::requests_routes;
pub use services::RequestService;
