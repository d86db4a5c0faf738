use anyhow::Result;
use tracing::info;

use super::greedy::{assign_clusters, cluster_description, cluster_name};
use crate::domains::clustering::models::{EmbeddedFeedback, FeedbackCluster, NewCluster};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusteringOutcome {
    /// Nothing has an embedding yet; existing clusters were left alone.
    NoEmbeddings,
    Clustered {
        clusters_created: usize,
        total_feedback: usize,
    },
}

/// Build the clusters for a set of embedded entries, in assignment order.
pub fn build_clusters(items: &[EmbeddedFeedback], threshold: f32) -> Vec<NewCluster> {
    let embeddings: Vec<&[f32]> = items.iter().map(|i| i.embedding.as_slice()).collect();

    assign_clusters(&embeddings, threshold)
        .into_iter()
        .map(|members| {
            let representative = &items[members[0]].content;
            NewCluster {
                name: cluster_name(representative),
                description: cluster_description(representative),
                members: members.iter().map(|&i| items[i].analysis_id).collect(),
            }
        })
        .collect()
}

/// Recompute every cluster from scratch and replace the stored clustering.
///
/// Concurrent runs are serialised on the clusters table; each one reads the
/// embeddings and writes its clusters inside the same transaction.
pub async fn cluster_feedback(deps: &ServerDeps) -> Result<ClusteringOutcome> {
    let mut tx = deps.db_pool.begin().await?;
    FeedbackCluster::lock_for_rebuild(&mut tx).await?;

    info!("Fetching feedback with embeddings");
    let items = EmbeddedFeedback::find_all(&mut tx).await?;

    if items.is_empty() {
        info!("No feedback with embeddings found");
        return Ok(ClusteringOutcome::NoEmbeddings);
    }

    info!(
        count = items.len(),
        threshold = deps.similarity_threshold,
        "Clustering feedback"
    );

    let clusters = build_clusters(&items, deps.similarity_threshold);
    let created = FeedbackCluster::write_all(&clusters, &mut tx).await?;
    tx.commit().await?;

    info!(
        clusters_created = created.len(),
        total_feedback = items.len(),
        "Clustering complete"
    );

    Ok(ClusteringOutcome::Clustered {
        clusters_created: created.len(),
        total_feedback: items.len(),
    })
}
