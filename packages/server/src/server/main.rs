// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::kernel::{scheduled_tasks, ServerDeps};
use triage_core::server::{auth::JwtVerifier, build_app, AppState};
use triage_core::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,triage_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Feedback Triage API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let deps = Arc::new(ServerDeps::from_config(pool, &config));
    let verifier = Arc::new(JwtVerifier::new(
        &config.auth_jwt_secret,
        config.auth_jwt_audience.clone(),
    ));

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = if config.digest_schedule_enabled {
        Some(
            scheduled_tasks::start_scheduler(deps.clone(), &config.digest_schedule)
                .await
                .context("Failed to start scheduled tasks")?,
        )
    } else {
        tracing::info!("Weekly digest schedule disabled");
        None
    };

    let app = build_app(AppState::new(deps, verifier));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
