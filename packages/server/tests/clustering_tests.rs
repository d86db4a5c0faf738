//! Integration tests for similarity clustering over stored embeddings.

mod common;

use crate::common::{create_analyzed_feedback, TestHarness};
use test_context::test_context;
use triage_core::common::AnalysisId;
use triage_core::domains::analysis::{FeedbackAnalysis, Impact, Sentiment, Urgency};
use triage_core::domains::clustering::activities::{cluster_feedback, ClusteringOutcome};
use triage_core::domains::clustering::{FeedbackCluster, NewCluster};
use triage_core::kernel::TestDependencies;

const LABELS: (Sentiment, Urgency, Impact) = (Sentiment::Negative, Urgency::Medium, Impact::Critical);

#[test_context(TestHarness)]
#[tokio::test]
async fn similar_feedback_ends_up_in_one_cluster(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let (_, export_slow) = create_analyzed_feedback(
        pool,
        "Export to CSV is very slow on large projects",
        LABELS,
        Some(vec![1.0, 0.0, 0.0]),
    )
    .await
    .unwrap();
    let (_, dark_mode) = create_analyzed_feedback(
        pool,
        "Please add dark mode",
        LABELS,
        Some(vec![0.0, 1.0, 0.0]),
    )
    .await
    .unwrap();
    let (_, export_timeout) = create_analyzed_feedback(
        pool,
        "Exports time out",
        LABELS,
        Some(vec![0.95, 0.05, 0.0]),
    )
    .await
    .unwrap();
    // No embedding: never clustered
    let (_, plain) = create_analyzed_feedback(pool, "Great support team", LABELS, None)
        .await
        .unwrap();

    let deps = ctx.deps(TestDependencies::new());
    let outcome = cluster_feedback(&deps).await.unwrap();

    assert_eq!(
        outcome,
        ClusteringOutcome::Clustered {
            clusters_created: 2,
            total_feedback: 3,
        }
    );

    let clusters = FeedbackCluster::find_all(pool).await.unwrap();
    assert_eq!(clusters.len(), 2);

    let largest = &clusters[0];
    assert_eq!(largest.feedback_count, 2);
    assert_eq!(largest.name, "Cluster: Export to CSV is very...");
    assert_eq!(
        largest.description.as_deref(),
        Some("Export to CSV is very slow on large projects")
    );

    let members: Vec<AnalysisId> = FeedbackAnalysis::find_by_cluster(largest.id, pool)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(members, vec![export_slow, export_timeout]);

    let smallest = &clusters[1];
    assert_eq!(smallest.feedback_count, 1);
    assert_eq!(smallest.name, "Cluster: Please add dark mode...");
    let members = FeedbackAnalysis::find_by_cluster(smallest.id, pool)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, dark_mode);

    let unclustered = sqlx::query_scalar::<_, Option<uuid::Uuid>>(
        "SELECT cluster_id FROM feedback_analysis WHERE id = $1",
    )
    .bind(plain)
    .fetch_one(pool)
    .await
    .unwrap();
    assert!(unclustered.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reclustering_replaces_previous_clusters(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    create_analyzed_feedback(pool, "Crash on login", LABELS, Some(vec![1.0, 0.0]))
        .await
        .unwrap();
    create_analyzed_feedback(pool, "App crashes at startup", LABELS, Some(vec![0.0, 1.0]))
        .await
        .unwrap();

    let strict = ctx.deps(TestDependencies::new().similarity_threshold(0.9));
    cluster_feedback(&strict).await.unwrap();
    let first_run = FeedbackCluster::find_all(pool).await.unwrap();
    assert_eq!(first_run.len(), 2);

    // Orthogonal vectors score 0, so a threshold of 0 merges them
    let loose = ctx.deps(TestDependencies::new().similarity_threshold(0.0));
    let outcome = cluster_feedback(&loose).await.unwrap();
    assert_eq!(
        outcome,
        ClusteringOutcome::Clustered {
            clusters_created: 1,
            total_feedback: 2,
        }
    );

    let second_run = FeedbackCluster::find_all(pool).await.unwrap();
    assert_eq!(second_run.len(), 1);
    assert_eq!(second_run[0].feedback_count, 2);
    assert!(first_run.iter().all(|old| old.id != second_run[0].id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn overlapping_runs_leave_a_single_clustering(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    create_analyzed_feedback(pool, "Search is slow", LABELS, Some(vec![1.0, 0.0]))
        .await
        .unwrap();
    create_analyzed_feedback(pool, "Search takes forever", LABELS, Some(vec![0.9, 0.1]))
        .await
        .unwrap();
    create_analyzed_feedback(pool, "Billing page is blank", LABELS, Some(vec![0.0, 1.0]))
        .await
        .unwrap();

    let deps = ctx.deps(TestDependencies::new());
    for _ in 0..3 {
        let (first, second) = tokio::join!(cluster_feedback(&deps), cluster_feedback(&deps));
        let expected = ClusteringOutcome::Clustered {
            clusters_created: 2,
            total_feedback: 3,
        };
        assert_eq!(first.unwrap(), expected);
        assert_eq!(second.unwrap(), expected);

        let clusters = FeedbackCluster::find_all(pool).await.unwrap();
        assert_eq!(clusters.len(), 2);
        let assigned: i32 = clusters.iter().map(|c| c.feedback_count).sum();
        assert_eq!(assigned, 3);
    }
}

#[test_context(TestHarness)]
#[tokio::test]
async fn no_embeddings_leaves_existing_clusters_alone(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    FeedbackCluster::replace_all(
        &[NewCluster {
            name: "Cluster: Legacy...".to_string(),
            description: "Legacy".to_string(),
            members: vec![],
        }],
        pool,
    )
    .await
    .unwrap();
    create_analyzed_feedback(pool, "No vector for me", LABELS, None)
        .await
        .unwrap();

    let deps = ctx.deps(TestDependencies::new());
    let outcome = cluster_feedback(&deps).await.unwrap();

    assert_eq!(outcome, ClusteringOutcome::NoEmbeddings);
    let clusters = FeedbackCluster::find_all(pool).await.unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].name, "Cluster: Legacy...");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn largest_clusters_come_first(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let mut ids = Vec::new();
    for content in ["a", "b", "c"] {
        let (_, analysis_id) = create_analyzed_feedback(pool, content, LABELS, Some(vec![1.0]))
            .await
            .unwrap();
        ids.push(analysis_id);
    }

    FeedbackCluster::replace_all(
        &[
            NewCluster {
                name: "small".to_string(),
                description: "small".to_string(),
                members: vec![ids[0]],
            },
            NewCluster {
                name: "big".to_string(),
                description: "big".to_string(),
                members: vec![ids[1], ids[2]],
            },
        ],
        pool,
    )
    .await
    .unwrap();

    let top = FeedbackCluster::find_largest(1, pool).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "big");
    assert_eq!(top[0].feedback_count, 2);
}
