use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{AnalysisId, ClusterId, FeedbackId, UserId};

/// Where a feedback entry came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSource {
    Manual,
    Csv,
}

impl FeedbackSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSource::Manual => "manual",
            FeedbackSource::Csv => "csv",
        }
    }
}

impl std::fmt::Display for FeedbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: FeedbackId,
    pub content: String,
    pub source: String,
    pub user_email: Option<String>,
    pub user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// Content and optional contact address for an entry not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub content: String,
    pub user_email: Option<String>,
}

/// Latest classification of an entry, as shown next to it in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub id: AnalysisId,
    pub sentiment: String,
    pub urgency: String,
    pub impact: String,
    pub cluster_id: Option<ClusterId>,
    pub analyzed_at: DateTime<Utc>,
}

/// A feedback entry with its latest analysis, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(flatten)]
    pub feedback: Feedback,
    pub analysis: Option<AnalysisSummary>,
}

#[derive(sqlx::FromRow)]
struct FeedbackEntryRow {
    #[sqlx(flatten)]
    feedback: Feedback,
    analysis_id: Option<AnalysisId>,
    sentiment: Option<String>,
    urgency: Option<String>,
    impact: Option<String>,
    cluster_id: Option<ClusterId>,
    analyzed_at: Option<DateTime<Utc>>,
}

impl From<FeedbackEntryRow> for FeedbackEntry {
    fn from(row: FeedbackEntryRow) -> Self {
        let analysis = match (
            row.analysis_id,
            row.sentiment,
            row.urgency,
            row.impact,
            row.analyzed_at,
        ) {
            (Some(id), Some(sentiment), Some(urgency), Some(impact), Some(analyzed_at)) => {
                Some(AnalysisSummary {
                    id,
                    sentiment,
                    urgency,
                    impact,
                    cluster_id: row.cluster_id,
                    analyzed_at,
                })
            }
            _ => None,
        };

        Self {
            feedback: row.feedback,
            analysis,
        }
    }
}

// Latest analysis per entry (LATERAL keeps it to one row each)
const ENTRY_SELECT: &str = r#"
    SELECT f.*,
           a.id AS analysis_id,
           a.sentiment,
           a.urgency,
           a.impact,
           a.cluster_id,
           a.analyzed_at
    FROM feedback f
    LEFT JOIN LATERAL (
        SELECT fa.id, fa.sentiment, fa.urgency, fa.impact, fa.cluster_id, fa.analyzed_at
        FROM feedback_analysis fa
        WHERE fa.feedback_id = f.id
        ORDER BY fa.analyzed_at DESC, fa.id DESC
        LIMIT 1
    ) a ON TRUE
"#;

// =============================================================================
// Feedback Queries
// =============================================================================

impl Feedback {
    pub async fn create(
        content: &str,
        source: FeedbackSource,
        user_email: Option<&str>,
        user_id: Option<UserId>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO feedback (content, source, user_email, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(content)
        .bind(source.as_str())
        .bind(user_email)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert every entry or none of them.
    pub async fn create_many(
        entries: &[NewFeedback],
        source: FeedbackSource,
        user_id: Option<UserId>,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(entries.len());

        for entry in entries {
            let row = sqlx::query_as::<_, Self>(
                r#"
                INSERT INTO feedback (content, source, user_email, user_id)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(&entry.content)
            .bind(source.as_str())
            .bind(entry.user_email.as_deref())
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn find_by_id(id: FeedbackId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM feedback WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Entries that have never been analysed, oldest first.
    pub async fn find_unanalyzed(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT f.* FROM feedback f
            WHERE NOT EXISTS (
                SELECT 1 FROM feedback_analysis fa WHERE fa.feedback_id = f.id
            )
            ORDER BY f.created_at, f.id
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Most recent entries with their latest analysis, newest first.
    pub async fn find_recent_with_analysis(limit: i64, pool: &PgPool) -> Result<Vec<FeedbackEntry>> {
        let sql = format!("{ENTRY_SELECT} ORDER BY f.created_at DESC, f.id DESC LIMIT $1");
        let rows = sqlx::query_as::<_, FeedbackEntryRow>(&sql)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(FeedbackEntry::from).collect())
    }

    /// Every entry with its latest analysis, oldest first.
    pub async fn find_all_with_analysis(pool: &PgPool) -> Result<Vec<FeedbackEntry>> {
        let sql = format!("{ENTRY_SELECT} ORDER BY f.created_at, f.id");
        let rows = sqlx::query_as::<_, FeedbackEntryRow>(&sql)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(FeedbackEntry::from).collect())
    }
}
