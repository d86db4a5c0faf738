use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::DigestId;

/// A generated digest as stored in `digest_history`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Digest {
    pub id: DigestId,
    pub content: String,
    pub summary: serde_json::Value,
    pub channels: Vec<String>,
    pub sent_at: DateTime<Utc>,
}

/// High-urgency or critical-impact feedback that feeds a digest.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CriticalFeedback {
    pub sentiment: String,
    pub urgency: String,
    pub impact: String,
    pub content: String,
    pub user_email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CriticalFeedback {
    /// Analysed since `since`, newest analysis first.
    pub async fn find_since(since: DateTime<Utc>, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT fa.sentiment, fa.urgency, fa.impact,
                   f.content, f.user_email, f.created_at
            FROM feedback_analysis fa
            JOIN feedback f ON f.id = fa.feedback_id
            WHERE fa.analyzed_at >= $1
              AND (fa.urgency = 'high' OR fa.impact = 'critical')
            ORDER BY fa.analyzed_at DESC, fa.id DESC
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

impl Digest {
    pub async fn create(
        content: &str,
        summary: &serde_json::Value,
        channels: &[String],
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO digest_history (content, summary, channels)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(content)
        .bind(summary)
        .bind(channels)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Latest first.
    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM digest_history ORDER BY sent_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
