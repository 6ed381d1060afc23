// src/main.rs
use axum::{
    extract::Extension,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod logging_middleware;
mod notifications;
mod participants;
mod requests;
mod rides;
mod users;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::JwtIdentityVerifier;
use common::dev_mode::{apply_cli_override, log_dev_mode_status, DevModeConfig};
use common::{AppConfig, AppState};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env();

    let dev_mode = apply_cli_override(DevModeConfig::from_env());
    log_dev_mode_status(&dev_mode);

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = config.database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool, config.reset_db).await?;

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let verifier = Arc::new(JwtIdentityVerifier::new(
        &config.jwt_secret,
        config.jwt_issuer.as_deref(),
        config.jwt_audience.as_deref(),
    ));
    info!("Identity verifier initialized");

    let app_state = AppState {
        db: pool,
        verifier,
        dev_mode,
    };

    let shared = Arc::new(RwLock::new(app_state));

    let app = build_router(shared, config.cors_header_values());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Brocab server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

async fn public_endpoint() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "This is a public endpoint"}))
}

fn build_router(shared: Arc<RwLock<AppState>>, cors_origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .route("/public", get(public_endpoint))
        // ====================================================================
        // USER DIRECTORY
        // ====================================================================
        .merge(users::users_routes())
        // ====================================================================
        // RIDES, JOIN REQUESTS AND PARTICIPANTS
        // ====================================================================
        .merge(rides::rides_routes())
        .merge(requests::requests_routes())
        .merge(participants::participants_routes())
        // ====================================================================
        // NOTIFICATIONS
        // ====================================================================
        .merge(notifications::notifications_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared))
        .layer(
            CorsLayer::new()
                .allow_origin(cors_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::HEAD,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::ORIGIN,
                    header::CONTENT_TYPE,
                    header::CONTENT_LENGTH,
                    header::ACCEPT,
                    header::AUTHORIZATION,
                ])
                .expose_headers([header::CONTENT_LENGTH])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http())
}
