//! Operator CLI for the batch jobs behind the HTTP API.
//!
//! Useful for backfilling analyses after an outage of the AI vendor, or for
//! running clustering and the digest by hand.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::domains::analysis::activities::analyze_pending;
use triage_core::domains::clustering::activities::{cluster_feedback, ClusteringOutcome};
use triage_core::domains::digest::activities::generate_digest;
use triage_core::kernel::ServerDeps;
use triage_core::Config;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Feedback triage batch jobs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every feedback entry that has no analysis yet
    AnalyzePending,

    /// Recompute feedback clusters from scratch
    Cluster,

    /// Generate and store a digest, printing it to stdout
    Digest,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,triage_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let deps = load_deps().await?;

    match cli.command {
        Commands::AnalyzePending => cmd_analyze_pending(&deps).await,
        Commands::Cluster => cmd_cluster(&deps).await,
        Commands::Digest => cmd_digest(&deps).await,
    }
}

async fn load_deps() -> Result<ServerDeps> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(ServerDeps::from_config(pool, &config))
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_analyze_pending(deps: &ServerDeps) -> Result<()> {
    let batch = analyze_pending(deps).await?;
    println!(
        "Analyzed {} feedback entries ({} failed)",
        batch.analyses.len(),
        batch.failed
    );
    Ok(())
}

async fn cmd_cluster(deps: &ServerDeps) -> Result<()> {
    match cluster_feedback(deps).await? {
        ClusteringOutcome::NoEmbeddings => println!("No feedback with embeddings found"),
        ClusteringOutcome::Clustered {
            clusters_created,
            total_feedback,
        } => println!(
            "Created {} clusters from {} feedback entries",
            clusters_created, total_feedback
        ),
    }
    Ok(())
}

async fn cmd_digest(deps: &ServerDeps) -> Result<()> {
    let digest = generate_digest(deps).await?;
    println!("{}", digest.content);
    Ok(())
}
