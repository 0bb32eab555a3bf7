//! # MindWork - Main Application Entry Point
//!
//! Initializes logging, loads configuration, builds the shared services and
//! starts the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- --port 5001
//! ```
//!
//! ## Environment Variables
//!
//! Every variable is optional. Set `GEMINI_API_KEY` to enable AI summaries;
//! see [`mindwork::Config::from_env`] for the full list.

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use mindwork::{create_router, AppState, Args, Config};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Main application entry point.
///
/// Initializes logging, loads configuration, creates service instances,
/// and starts the HTTP server with appropriate middleware.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();

    info!("Starting MindWork on {}:{}", args.host, args.port);

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration for environment: {} (AI summaries {})",
        config.environment,
        if config.ai.is_enabled() { "enabled" } else { "disabled" }
    );
    let purge_interval = config.cache.purge_interval();

    // Initialize services
    let app_state = AppState::from_config(config)?;

    // Purge expired cache entries in the background
    let cache = app_state.cache.clone();
    tokio::spawn(async move {
        cache.start_periodic_purge(purge_interval).await;
    });

    // Create router with middleware
    let app = create_router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("Server listening on http://{}:{}", args.host, args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
