//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! The weekly digest runs in-process on a cron schedule (default Monday 09:00
//! UTC). It calls the same activity as `POST /generate-digest`.

use anyhow::Result;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::digest::activities::generate_digest;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: Arc<ServerDeps>, digest_schedule: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let digest_deps = deps.clone();
    let digest_job = Job::new_async(digest_schedule, move |_uuid, _lock| {
        let deps = digest_deps.clone();
        Box::pin(async move {
            if let Err(e) = run_weekly_digest(&deps).await {
                tracing::error!("Weekly digest task failed: {}", e);
            }
        })
    })?;

    scheduler.add(digest_job).await?;
    scheduler.start().await?;

    tracing::info!(schedule = %digest_schedule, "Scheduled tasks started (weekly digest)");
    Ok(scheduler)
}

async fn run_weekly_digest(deps: &ServerDeps) -> Result<()> {
    tracing::info!("Running weekly digest task");

    let digest = generate_digest(deps).await?;

    tracing::info!(
        length = digest.content.len(),
        critical_feedback = digest.total_feedback,
        top_clusters = digest.top_clusters,
        "Weekly digest generated"
    );
    Ok(())
}
