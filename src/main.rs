//! License server binary entry point.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Apply startup setting overrides (required products, key prefix)
//! 5. Build HTTP router and start server on configured port

use license_server::{AppState, config::Config, db, services::license_service};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Environment-provided settings take precedence over whatever an admin
    // last stored, so a deployment is reproducible from config alone.
    license_service::apply_startup_overrides(&pool, &config).await?;

    let state = AppState::new(pool, &config.admin_api_key);
    let app = license_server::app(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
