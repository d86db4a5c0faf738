//! Chat assistant grounded in the full feedback set.
//!
//! Every turn sends the whole feedback table (with latest labels) in the
//! system prompt, followed by the stored conversation history.

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::common::{ConversationId, TriageError, UserId};
use crate::domains::chat::models::{ChatConversation, ChatMessage, Exchange};
use crate::domains::feedback::models::{Feedback, FeedbackEntry};
use crate::kernel::{Message, ServerDeps};

const TITLE_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: ConversationId,
}

/// `Feedback: "<content>" | Source: <source> | Sentiment: <s> | ...`
pub fn feedback_context_line(entry: &FeedbackEntry) -> String {
    let analysis = entry.analysis.as_ref();
    let label = |value: Option<&str>| value.unwrap_or("N/A").to_string();

    format!(
        "Feedback: \"{}\" | Source: {} | Sentiment: {} | Urgency: {} | Impact: {}",
        entry.feedback.content,
        entry.feedback.source,
        label(analysis.map(|a| a.sentiment.as_str())),
        label(analysis.map(|a| a.urgency.as_str())),
        label(analysis.map(|a| a.impact.as_str())),
    )
}

pub fn assistant_system_prompt(entries: &[FeedbackEntry]) -> String {
    let context = entries
        .iter()
        .map(feedback_context_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an AI assistant helping analyze customer feedback. You have access to all feedback data below:\n\n{context}\n\nProvide helpful insights, summaries, and analysis based on this feedback data. Be concise and actionable."
    )
}

/// Title for a conversation opened by `message`.
pub fn conversation_title(message: &str) -> String {
    if message.chars().count() > TITLE_MAX_CHARS {
        let head: String = message.chars().take(TITLE_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        message.to_string()
    }
}

/// Answer `message` in the context of all feedback and the conversation so far.
///
/// Turns are stored only after the assistant replies, so a failed call leaves
/// the conversation untouched (and creates none).
pub async fn chat_with_feedback(
    user_id: UserId,
    message: &str,
    conversation_id: Option<ConversationId>,
    deps: &ServerDeps,
) -> Result<ChatReply> {
    let message = message.trim();
    if message.is_empty() {
        return Err(TriageError::invalid("Message is required").into());
    }

    let pool = &deps.db_pool;

    let history = match conversation_id {
        Some(id) => {
            if ChatConversation::find_owned(id, user_id, pool).await?.is_none() {
                return Err(TriageError::NotFound("Conversation").into());
            }
            ChatMessage::find_by_conversation(id, pool).await?
        }
        None => Vec::new(),
    };

    let feedback = Feedback::find_all_with_analysis(pool).await?;

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(assistant_system_prompt(&feedback)));
    for turn in &history {
        messages.push(turn.to_message()?);
    }
    messages.push(Message::user(message));

    info!(
        user_id = %user_id,
        feedback_count = feedback.len(),
        history_len = history.len(),
        "Asking feedback assistant"
    );

    let response = deps.assistant.complete(messages, None).await?;

    let conversation_id = ChatConversation::record_exchange(
        conversation_id,
        user_id,
        &conversation_title(message),
        Exchange {
            user_message: message,
            assistant_message: &response,
        },
        pool,
    )
    .await?;

    info!(conversation_id = %conversation_id, "Feedback assistant replied");

    Ok(ChatReply {
        response,
        conversation_id,
    })
}

/// The user's conversations, most recently active first.
pub async fn list_conversations(user_id: UserId, deps: &ServerDeps) -> Result<Vec<ChatConversation>> {
    ChatConversation::find_for_user(user_id, &deps.db_pool).await
}

/// Messages of a conversation the user owns, oldest first.
pub async fn conversation_messages(
    user_id: UserId,
    conversation_id: ConversationId,
    deps: &ServerDeps,
) -> Result<Vec<ChatMessage>> {
    let pool = &deps.db_pool;
    if ChatConversation::find_owned(conversation_id, user_id, pool)
        .await?
        .is_none()
    {
        return Err(TriageError::NotFound("Conversation").into());
    }

    ChatMessage::find_by_conversation(conversation_id, pool).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{AnalysisId, FeedbackId};
    use crate::domains::feedback::models::AnalysisSummary;
    use chrono::Utc;

    fn entry(content: &str, source: &str, labels: Option<(&str, &str, &str)>) -> FeedbackEntry {
        FeedbackEntry {
            feedback: Feedback {
                id: FeedbackId::new(),
                content: content.to_string(),
                source: source.to_string(),
                user_email: None,
                user_id: None,
                created_at: Utc::now(),
            },
            analysis: labels.map(|(sentiment, urgency, impact)| AnalysisSummary {
                id: AnalysisId::new(),
                sentiment: sentiment.to_string(),
                urgency: urgency.to_string(),
                impact: impact.to_string(),
                cluster_id: None,
                analyzed_at: Utc::now(),
            }),
        }
    }

    #[test]
    fn context_line_for_analysed_entry() {
        let line = feedback_context_line(&entry(
            "Invoices are wrong",
            "csv",
            Some(("negative", "high", "critical")),
        ));

        assert_eq!(
            line,
            "Feedback: \"Invoices are wrong\" | Source: csv | Sentiment: negative | Urgency: high | Impact: critical"
        );
    }

    #[test]
    fn context_line_for_unanalysed_entry() {
        let line = feedback_context_line(&entry("Nice app", "manual", None));

        assert_eq!(
            line,
            "Feedback: \"Nice app\" | Source: manual | Sentiment: N/A | Urgency: N/A | Impact: N/A"
        );
    }

    #[test]
    fn system_prompt_wraps_context() {
        let prompt = assistant_system_prompt(&[
            entry("One", "manual", None),
            entry("Two", "csv", None),
        ]);

        assert!(prompt.starts_with(
            "You are an AI assistant helping analyze customer feedback. You have access to all feedback data below:\n\nFeedback: \"One\""
        ));
        assert!(prompt.contains("Impact: N/A\nFeedback: \"Two\""));
        assert!(prompt.ends_with("Be concise and actionable."));
    }

    #[test]
    fn short_titles_are_kept() {
        assert_eq!(conversation_title("What are users angry about?"), "What are users angry about?");
        let exact = "a".repeat(50);
        assert_eq!(conversation_title(&exact), exact);
    }

    #[test]
    fn long_titles_are_truncated() {
        let message = "x".repeat(51);
        assert_eq!(conversation_title(&message), format!("{}...", "x".repeat(50)));

        let accented = "é".repeat(60);
        assert_eq!(conversation_title(&accented).chars().count(), 53);
    }
}
