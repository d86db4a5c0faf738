//! CSV bulk intake.
//!
//! Expected layout is a header line followed by `content,email` rows. Content
//! may be wrapped in double quotes to carry commas; there is no escaping of
//! quotes inside quoted content.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::common::{TriageError, UserId};
use crate::domains::analysis::activities::analyze_each;
use crate::domains::feedback::models::{Feedback, FeedbackSource, NewFeedback};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Serialize)]
pub struct CsvUploadResult {
    pub uploaded: usize,
    pub analyzed: usize,
    pub failed: usize,
    pub feedback: Vec<Feedback>,
}

/// Parse an uploaded CSV into feedback entries.
///
/// Blank lines are dropped before the header is skipped. Unquoted rows with
/// no comma and rows whose content trims to nothing are dropped.
pub fn parse_feedback_csv(text: &str) -> Vec<NewFeedback> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .skip(1)
        .filter_map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Option<NewFeedback> {
    let line = line.trim_end_matches('\r');

    let (content, email) = if let Some(quoted) = line.strip_prefix('"') {
        match quoted.find("\",") {
            Some(end) => (&quoted[..end], Some(&quoted[end + 2..])),
            None => (quoted.trim_end().trim_end_matches('"'), None),
        }
    } else {
        let comma = line.rfind(',')?;
        (&line[..comma], Some(&line[comma + 1..]))
    };

    let content = content.trim();
    if content.is_empty() {
        return None;
    }

    Some(NewFeedback {
        content: content.to_string(),
        user_email: email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string),
    })
}

/// Store every row of an uploaded CSV, then analyse them one by one.
pub async fn upload_feedback_csv(
    file_name: &str,
    text: &str,
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<CsvUploadResult> {
    if !file_name.ends_with(".csv") {
        return Err(TriageError::invalid("Please upload a CSV file").into());
    }

    let entries = parse_feedback_csv(text);
    if entries.is_empty() {
        return Err(TriageError::invalid("No valid feedback found in CSV").into());
    }

    let feedback =
        Feedback::create_many(&entries, FeedbackSource::Csv, Some(user_id), &deps.db_pool).await?;

    info!(
        file_name = %file_name,
        uploaded = feedback.len(),
        user_id = %user_id,
        "CSV feedback uploaded, analyzing"
    );

    let batch = analyze_each(&feedback, deps).await;

    info!(
        analyzed = batch.analyses.len(),
        failed = batch.failed,
        "CSV feedback analysis complete"
    );

    Ok(CsvUploadResult {
        uploaded: feedback.len(),
        analyzed: batch.analyses.len(),
        failed: batch.failed,
        feedback,
    })
}
