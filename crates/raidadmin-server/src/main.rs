//! Raid administration HTTP server
//!
//! Serves the admin page of a raid event site and executes the actions its
//! forms post back.

use axum::{Router, extract::DefaultBodyLimit, response::Json, routing::get};
use raidadmin::{MAX_FILE_SIZE, MemoryStorage, Raid, RaidAdmin, RaidStorage};
use serde_json::{Value, json};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod auth;
mod config;
mod error;
mod models;
mod routes;

use config::ServerConfig;
use error::Result;

/// Room for the other form fields next to the uploaded file
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Main application state
#[derive(Clone)]
pub struct AppState {
    pub admin: RaidAdmin<MemoryStorage>,
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let default_filter = if config.debug {
        "raidadmin_server=debug,tower_http=debug"
    } else {
        "raidadmin_server=info,tower_http=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        )
        .init();

    info!(
        "Starting raid admin server on {}:{}",
        config.host, config.port
    );
    if config.administrator.is_none() && config.moderator.is_none() {
        warn!("No ADMIN_USERNAME or MODERATOR_USERNAME configured; every request will be refused");
    }

    let storage = match &config.seed_file {
        Some(path) => load_seed(path).await?,
        None => MemoryStorage::new(),
    };

    let state = AppState {
        admin: RaidAdmin::new(storage),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| error::ApiError::Config(format!("Invalid HOST value: {}", config.host)))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}{}", addr, config.script_path);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Read raids to start with from a JSON array
async fn load_seed(path: &str) -> Result<MemoryStorage> {
    let bytes = tokio::fs::read(path).await?;
    let raids: Vec<Raid> = serde_json::from_slice(&bytes)?;
    info!("Loaded {} raids from {}", raids.len(), path);

    let storage = MemoryStorage::new();
    for raid in &raids {
        storage.save_raid(raid).await?;
    }
    Ok(storage)
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let script_path = state.config.script_path.clone();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(routes::admin::router(&script_path))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + FORM_OVERHEAD_BYTES)),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Result<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "raidadmin-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": time::OffsetDateTime::now_utc()
    })))
}
