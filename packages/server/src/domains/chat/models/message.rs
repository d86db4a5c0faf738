use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ChatMessageId, ConversationId};
use crate::kernel::Message;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub conversation_id: ConversationId,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Oldest first.
    pub async fn find_by_conversation(
        conversation_id: ConversationId,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM chat_messages
            WHERE conversation_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(conversation_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// As a completion message for replaying history.
    pub fn to_message(&self) -> Result<Message> {
        match self.role.as_str() {
            "user" => Ok(Message::user(&self.content)),
            "assistant" => Ok(Message::assistant(&self.content)),
            other => Err(anyhow!("Invalid chat message role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Role;

    fn stored(role: &str) -> ChatMessage {
        ChatMessage {
            id: ChatMessageId::new(),
            conversation_id: ConversationId::new(),
            role: role.to_string(),
            content: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn replays_stored_roles() {
        assert_eq!(stored("user").to_message().unwrap().role, Role::User);
        assert_eq!(stored("assistant").to_message().unwrap().role, Role::Assistant);
        assert!(stored("system").to_message().is_err());
    }
}
