// src/repositories/postgres/notification.rs

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use talentdesk_common::models::notification::Notification;
pub use talentdesk_common::traits::repository_traits::NotificationRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: Pool<Postgres>,
}

impl PostgresNotificationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_notification(r: &PgRow) -> Result<Notification, Error> {
    Ok(Notification {
        notification_id: r.try_get("notification_id")?,
        account_id: r.try_get("account_id")?,
        event_type: r.try_get("event_type")?,
        body: r.try_get("body")?,
        read: r.try_get("read")?,
        created_at: r.try_get("created_at")?,
    })
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                notification_id, account_id, event_type, body, read, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(notification.notification_id)
        .bind(notification.account_id)
        .bind(&notification.event_type)
        .bind(&notification.body)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_batch(&self, notifications: &[Notification]) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;
        for n in notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications (
                    notification_id, account_id, event_type, body, read, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(n.notification_id)
            .bind(n.account_id)
            .bind(&n.event_type)
            .bind(&n.body)
            .bind(n.read)
            .bind(n.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT notification_id, account_id, event_type, body, read, created_at
            FROM notifications
            WHERE account_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_notification).collect()
    }

    async fn mark_read(&self, notification_id: Uuid) -> Result<(), Error> {
        sqlx::query("UPDATE notifications SET read = TRUE WHERE notification_id = $1")
            .bind(notification_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn unread_count(&self, account_id: Uuid) -> Result<i64, Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS unread
            FROM notifications
            WHERE account_id = $1 AND read = FALSE
            "#,
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("unread")?)
    }
}
