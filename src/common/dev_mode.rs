// src/common/dev_mode.rs
//! Development mode configuration
//! Lets a local frontend talk to the API without a real identity provider

use std::env;
use tracing::{info, warn};

/// External identity every request is attributed to while dev mode is on
pub const DEFAULT_DEV_UID: &str = "dev-user-0001";

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_uid: String,
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        let mut config = Self::disabled();

        config.enabled = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        if let Some(uid) = env::var("DEV_USER_UID").ok().filter(|s| !s.trim().is_empty()) {
            config.user_uid = uid;
        }

        config
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            user_uid: DEFAULT_DEV_UID.to_string(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Log dev mode status on startup
pub fn log_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        warn!(
            dev_uid = %config.user_uid,
            "DEV MODE ENABLED: credential verification bypassed, do not use in production"
        );
    } else {
        info!("Production mode - bearer credentials required");
    }
}

/// CLI argument parsing for dev mode
pub fn parse_dev_mode_args<I>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = String>,
{
    let mut decision = None;
    for arg in args {
        match arg.as_str() {
            "--dev" | "--dev-mode" => decision = Some(true),
            "--no-dev" | "--prod" | "--production" => decision = Some(false),
            _ => {}
        }
    }
    decision
}

/// Override dev mode from CLI args
pub fn apply_cli_override(mut config: DevModeConfig) -> DevModeConfig {
    if let Some(cli_dev_mode) = parse_dev_mode_args(env::args()) {
        info!(dev_mode = cli_dev_mode, "CLI override for DEV_MODE");
        config.enabled = cli_dev_mode;
    }

    config
}
