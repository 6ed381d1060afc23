// Common module - shared types and utilities across all modules

pub mod config;
pub mod dev_mode;
pub mod error;
pub mod helpers;
pub mod migrations;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use error::{is_unique_violation, ApiError};
pub use helpers::{parse_id, safe_email_log};
pub use state::AppState;
pub use validation::{ValidationResult, Validator};
