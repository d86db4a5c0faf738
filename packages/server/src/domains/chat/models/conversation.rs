use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{ConversationId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatConversation {
    pub id: ConversationId,
    pub user_id: UserId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One question/answer pair to append to a conversation.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub user_message: &'a str,
    pub assistant_message: &'a str,
}

impl ChatConversation {
    pub async fn create(user_id: UserId, title: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO chat_conversations (user_id, title) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ConversationId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM chat_conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Only returns the conversation when `user_id` owns it.
    pub async fn find_owned(
        id: ConversationId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM chat_conversations WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Most recently active first.
    pub async fn find_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM chat_conversations
            WHERE user_id = $1
            ORDER BY updated_at DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Store both turns of an exchange and bump `updated_at`, atomically.
    ///
    /// Without an existing conversation a new one is opened for `user_id`
    /// with `new_title`.
    pub async fn record_exchange(
        existing: Option<ConversationId>,
        user_id: UserId,
        new_title: &str,
        exchange: Exchange<'_>,
        pool: &PgPool,
    ) -> Result<ConversationId> {
        let mut tx = pool.begin().await?;

        let conversation_id = match existing {
            Some(id) => id,
            None => {
                sqlx::query_scalar::<_, ConversationId>(
                    "INSERT INTO chat_conversations (user_id, title) VALUES ($1, $2) RETURNING id",
                )
                .bind(user_id)
                .bind(new_title)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        for (role, content) in [
            ("user", exchange.user_message),
            ("assistant", exchange.assistant_message),
        ] {
            sqlx::query(
                "INSERT INTO chat_messages (conversation_id, role, content) VALUES ($1, $2, $3)",
            )
            .bind(conversation_id)
            .bind(role)
            .bind(content)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE chat_conversations SET updated_at = NOW() WHERE id = $1")
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(conversation_id)
    }
}
