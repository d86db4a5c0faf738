use anyhow::Result;
use serde::Serialize;
use sqlx::PgPool;
use std::str::FromStr;

use crate::domains::analysis::{FeedbackAnalysis, Impact, Sentiment, Urgency};
use crate::domains::feedback::models::{Feedback, FeedbackEntry};

/// Entries shown in the dashboard table.
pub const RECENT_FEEDBACK_LIMIT: i64 = 50;

/// Ordering for the feedback table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackSort {
    /// Newest first
    #[default]
    Date,
    /// Negative, neutral, positive
    Sentiment,
    /// High, medium, low
    Urgency,
    /// Critical, feature request, nice to have
    Impact,
}

impl FeedbackSort {
    /// Unknown or missing keys fall back to `Date`.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("sentiment") => FeedbackSort::Sentiment,
            Some("urgency") => FeedbackSort::Urgency,
            Some("impact") => FeedbackSort::Impact,
            _ => FeedbackSort::Date,
        }
    }
}

// Unanalysed or unrecognised labels sort after every known label.
fn label_rank<T: FromStr>(label: Option<&str>, rank: impl Fn(&T) -> u8) -> u8 {
    label
        .and_then(|l| l.parse::<T>().ok())
        .map(|v| rank(&v))
        .unwrap_or(u8::MAX)
}

/// Stable sort, so ties keep their incoming (newest-first) order.
pub fn sort_entries(entries: &mut [FeedbackEntry], sort: FeedbackSort) {
    match sort {
        FeedbackSort::Date => {
            entries.sort_by(|a, b| b.feedback.created_at.cmp(&a.feedback.created_at))
        }
        FeedbackSort::Sentiment => entries.sort_by_key(|e| {
            label_rank::<Sentiment>(
                e.analysis.as_ref().map(|a| a.sentiment.as_str()),
                Sentiment::rank,
            )
        }),
        FeedbackSort::Urgency => entries.sort_by_key(|e| {
            label_rank::<Urgency>(
                e.analysis.as_ref().map(|a| a.urgency.as_str()),
                Urgency::rank,
            )
        }),
        FeedbackSort::Impact => entries.sort_by_key(|e| {
            label_rank::<Impact>(e.analysis.as_ref().map(|a| a.impact.as_str()), Impact::rank)
        }),
    }
}

/// The most recent entries with their latest analysis, in the requested order.
pub async fn list_feedback(sort: FeedbackSort, pool: &PgPool) -> Result<Vec<FeedbackEntry>> {
    let mut entries = Feedback::find_recent_with_analysis(RECENT_FEEDBACK_LIMIT, pool).await?;
    sort_entries(&mut entries, sort);
    Ok(entries)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: i64,
    pub neutral: i64,
    pub negative: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrgencyCounts {
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactCounts {
    pub critical: i64,
    pub feature_request: i64,
    pub nice_to_have: i64,
}

/// Dashboard totals: every feedback entry, and label counts over every
/// analysis row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackAnalytics {
    pub total_feedback: i64,
    pub sentiment: SentimentCounts,
    pub urgency: UrgencyCounts,
    pub impact: ImpactCounts,
}

pub async fn feedback_analytics(pool: &PgPool) -> Result<FeedbackAnalytics> {
    let counts = FeedbackAnalysis::count_by_label(pool).await?;

    Ok(FeedbackAnalytics {
        total_feedback: counts.feedback_entries,
        sentiment: SentimentCounts {
            positive: counts.positive,
            neutral: counts.neutral,
            negative: counts.negative,
        },
        urgency: UrgencyCounts {
            high: counts.high,
            medium: counts.medium,
            low: counts.low,
        },
        impact: ImpactCounts {
            critical: counts.critical,
            feature_request: counts.feature_request,
            nice_to_have: counts.nice_to_have,
        },
    })
}
