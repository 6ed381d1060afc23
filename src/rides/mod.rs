//! # Rides Module
//!
//! Ride catalog: posting, public search, leader lookup and cascading deletion.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use models::Ride;
pub use routes::rides_routes;
pub use services::RideService;
