// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::IdentityVerifier;
use crate::common::dev_mode::DevModeConfig;

/// Application state containing the database pool and the identity verifier
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub dev_mode: DevModeConfig,
}
