use anyhow::Result;
use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{AnalysisId, ClusterId, FeedbackId};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackCluster {
    pub id: ClusterId,
    pub name: String,
    pub description: Option<String>,
    pub feedback_count: i32,
    pub created_at: DateTime<Utc>,
}

/// A cluster ready to be written, with the analysis rows it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCluster {
    pub name: String,
    pub description: String,
    pub members: Vec<AnalysisId>,
}

/// Clustering input: an analysis row with its embedding and the text it was
/// computed from.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmbeddedFeedback {
    pub analysis_id: AnalysisId,
    pub feedback_id: FeedbackId,
    pub content: String,
    pub embedding: Vector,
}

impl EmbeddedFeedback {
    /// Every analysis row that has an embedding, in a stable order.
    pub async fn find_all(conn: &mut PgConnection) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT fa.id AS analysis_id,
                   fa.feedback_id,
                   f.content,
                   fa.embedding_vector AS embedding
            FROM feedback_analysis fa
            JOIN feedback f ON f.id = fa.feedback_id
            WHERE fa.embedding_vector IS NOT NULL
            ORDER BY fa.analyzed_at, fa.id
            "#,
        )
        .fetch_all(conn)
        .await
        .map_err(Into::into)
    }
}

// =============================================================================
// Cluster Queries
// =============================================================================

impl FeedbackCluster {
    /// Largest first.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM feedback_clusters ORDER BY feedback_count DESC, created_at, id",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_largest(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM feedback_clusters
            ORDER BY feedback_count DESC, created_at, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Block until no other transaction is rebuilding the clusters.
    /// Held until the surrounding transaction ends.
    pub async fn lock_for_rebuild(conn: &mut PgConnection) -> Result<()> {
        sqlx::query("LOCK TABLE feedback_clusters IN EXCLUSIVE MODE")
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Swap the whole clustering for a new one in a single transaction.
    pub async fn replace_all(clusters: &[NewCluster], pool: &PgPool) -> Result<Vec<Self>> {
        let mut tx = pool.begin().await?;
        Self::lock_for_rebuild(&mut tx).await?;
        let created = Self::write_all(clusters, &mut tx).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Delete every stored cluster and insert `clusters` in their place.
    /// Callers hold [`Self::lock_for_rebuild`] in the same transaction.
    ///
    /// Deleting the old clusters clears `feedback_analysis.cluster_id`
    /// through the foreign key, so rows left out of `clusters` end up
    /// unassigned.
    pub async fn write_all(clusters: &[NewCluster], conn: &mut PgConnection) -> Result<Vec<Self>> {
        sqlx::query("DELETE FROM feedback_clusters")
            .execute(&mut *conn)
            .await?;

        let mut created = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            let row = sqlx::query_as::<_, Self>(
                r#"
                INSERT INTO feedback_clusters (name, description, feedback_count)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(&cluster.name)
            .bind(&cluster.description)
            .bind(cluster.members.len() as i32)
            .fetch_one(&mut *conn)
            .await?;

            sqlx::query("UPDATE feedback_analysis SET cluster_id = $1 WHERE id = ANY($2)")
                .bind(row.id)
                .bind(&cluster.members)
                .execute(&mut *conn)
                .await?;

            created.push(row);
        }

        Ok(created)
    }
}
