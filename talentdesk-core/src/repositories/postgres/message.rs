// src/repositories/postgres/message.rs

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use talentdesk_common::models::message::{Message, MessageKind, MessageStatus};
pub use talentdesk_common::traits::repository_traits::MessageRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresMessageRepository {
    pool: Pool<Postgres>,
}

impl PostgresMessageRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const MESSAGE_COLUMNS: &str = r#"
    message_id, sender_id, sender_name, recipient_id, recipient_name,
    subject, body, status, kind, conversation_id, saved, is_reply, created_at
"#;

fn row_to_message(r: &PgRow) -> Result<Message, Error> {
    let status: String = r.try_get("status")?;
    let kind: String = r.try_get("kind")?;
    Ok(Message {
        message_id: r.try_get("message_id")?,
        sender_id: r.try_get("sender_id")?,
        sender_name: r.try_get("sender_name")?,
        recipient_id: r.try_get("recipient_id")?,
        recipient_name: r.try_get("recipient_name")?,
        subject: r.try_get("subject")?,
        body: r.try_get("body")?,
        status: MessageStatus::from_str(&status).map_err(Error::Parse)?,
        kind: MessageKind::from_str(&kind).map_err(Error::Parse)?,
        conversation_id: r.try_get("conversation_id")?,
        saved: r.try_get("saved")?,
        is_reply: r.try_get("is_reply")?,
        created_at: r.try_get("created_at")?,
    })
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO messages (
                message_id, sender_id, sender_name, recipient_id, recipient_name,
                subject, body, status, kind, conversation_id, saved, is_reply, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(message.message_id)
        .bind(message.sender_id)
        .bind(&message.sender_name)
        .bind(message.recipient_id)
        .bind(&message.recipient_name)
        .bind(&message.subject)
        .bind(&message.body)
        .bind(message.status.to_string())
        .bind(message.kind.to_string())
        .bind(&message.conversation_id)
        .bind(message.saved)
        .bind(message.is_reply)
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, message_id: Uuid) -> Result<Option<Message>, Error> {
        let row = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = $1"
        ))
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_message).transpose()
    }

    async fn set_status(&self, message_id: Uuid, status: MessageStatus) -> Result<(), Error> {
        sqlx::query("UPDATE messages SET status = $1 WHERE message_id = $2")
            .bind(status.to_string())
            .bind(message_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_saved(&self, message_id: Uuid, saved: bool) -> Result<(), Error> {
        sqlx::query("UPDATE messages SET saved = $1 WHERE message_id = $2")
            .bind(saved)
            .bind(message_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_conversation_id(
        &self,
        message_id: Uuid,
        conversation_id: &str,
    ) -> Result<(), Error> {
        sqlx::query("UPDATE messages SET conversation_id = $1 WHERE message_id = $2")
            .bind(conversation_id)
            .bind(message_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#
        ))
        .bind(recipient_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_message).collect()
    }

    async fn list_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, Error> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC
            "#
        ))
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_message).collect()
    }

    async fn list_conversation(&self, conversation_id: &str) -> Result<Vec<Message>, Error> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_message).collect()
    }
}
