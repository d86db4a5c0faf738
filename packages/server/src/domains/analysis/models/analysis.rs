use anyhow::Result;
use chrono::{DateTime, Utc};
use pgvector::Vector;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::Classification;
use crate::common::{AnalysisId, ClusterId, FeedbackId};

/// One classification run over one feedback entry.
///
/// A feedback entry may be analysed more than once; readers take the latest
/// row by `analyzed_at`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeedbackAnalysis {
    pub id: AnalysisId,
    pub feedback_id: FeedbackId,
    pub sentiment: String,
    pub urgency: String,
    pub impact: String,
    #[serde(skip)]
    pub embedding_vector: Option<Vector>,
    pub cluster_id: Option<ClusterId>,
    pub analyzed_at: DateTime<Utc>,
}

/// Label counts across every analysis row, plus the number of feedback
/// entries whether analysed or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct ClassificationCounts {
    pub feedback_entries: i64,
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
    pub high: i64,
    pub medium: i64,
    pub low: i64,
    pub critical: i64,
    pub feature_request: i64,
    pub nice_to_have: i64,
}

impl FeedbackAnalysis {
    pub async fn create(
        feedback_id: FeedbackId,
        classification: &Classification,
        embedding: Option<Vec<f32>>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO feedback_analysis (feedback_id, sentiment, urgency, impact, embedding_vector)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(feedback_id)
        .bind(classification.sentiment.as_str())
        .bind(classification.urgency.as_str())
        .bind(classification.impact.as_str())
        .bind(embedding.map(Vector::from))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_latest_for_feedback(
        feedback_id: FeedbackId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM feedback_analysis
            WHERE feedback_id = $1
            ORDER BY analyzed_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(feedback_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_cluster(cluster_id: ClusterId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM feedback_analysis WHERE cluster_id = $1 ORDER BY analyzed_at, id",
        )
        .bind(cluster_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_by_label(pool: &PgPool) -> Result<ClassificationCounts> {
        sqlx::query_as::<_, ClassificationCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM feedback) AS feedback_entries,
                COUNT(*) FILTER (WHERE sentiment = 'positive') AS positive,
                COUNT(*) FILTER (WHERE sentiment = 'neutral') AS neutral,
                COUNT(*) FILTER (WHERE sentiment = 'negative') AS negative,
                COUNT(*) FILTER (WHERE urgency = 'high') AS high,
                COUNT(*) FILTER (WHERE urgency = 'medium') AS medium,
                COUNT(*) FILTER (WHERE urgency = 'low') AS low,
                COUNT(*) FILTER (WHERE impact = 'critical') AS critical,
                COUNT(*) FILTER (WHERE impact = 'feature_request') AS feature_request,
                COUNT(*) FILTER (WHERE impact = 'nice_to_have') AS nice_to_have
            FROM feedback_analysis
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
