// src/repositories/postgres/account_audit_log.rs

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use talentdesk_common::models::account::AccountAuditLogEntry;
pub use talentdesk_common::traits::repository_traits::AccountAuditLogRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresAccountAuditLogRepository {
    pool: Pool<Postgres>,
}

impl PostgresAccountAuditLogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_entry(r: &PgRow) -> Result<AccountAuditLogEntry, Error> {
    Ok(AccountAuditLogEntry {
        audit_id: r.try_get("audit_id")?,
        account_id: r.try_get("account_id")?,
        event_type: r.try_get("event_type")?,
        old_value: r.try_get("old_value")?,
        new_value: r.try_get("new_value")?,
        changed_by: r.try_get("changed_by")?,
        timestamp: r.try_get("timestamp")?,
        metadata: r.try_get("metadata")?,
    })
}

#[async_trait]
impl AccountAuditLogRepository for PostgresAccountAuditLogRepository {
    async fn insert_entry(&self, entry: &AccountAuditLogEntry) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO account_audit_log (
                audit_id, account_id, event_type,
                old_value, new_value, changed_by,
                timestamp, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.audit_id)
        .bind(entry.account_id)
        .bind(&entry.event_type)
        .bind(&entry.old_value)
        .bind(&entry.new_value)
        .bind(entry.changed_by)
        .bind(entry.timestamp)
        .bind(&entry.metadata)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_entry(&self, audit_id: Uuid) -> Result<Option<AccountAuditLogEntry>, Error> {
        let row = sqlx::query(
            r#"
            SELECT
                audit_id, account_id, event_type,
                old_value, new_value, changed_by,
                timestamp, metadata
            FROM account_audit_log
            WHERE audit_id = $1
            "#,
        )
        .bind(audit_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_entry).transpose()
    }

    async fn entries_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AccountAuditLogEntry>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT
                audit_id, account_id, event_type,
                old_value, new_value, changed_by,
                timestamp, metadata
            FROM account_audit_log
            WHERE account_id = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#,
        )
        .bind(account_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_entry).collect()
    }
}
