// src/repositories/postgres/account.rs

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use talentdesk_common::models::account::{Account, ApprovalStatus, Rejection, Role};
pub use talentdesk_common::traits::repository_traits::AccountRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: Pool<Postgres>,
}

impl PostgresAccountRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const ACCOUNT_COLUMNS: &str = r#"
    account_id, email, display_name, role, status,
    rejection_reason, rejected_at, rejected_by, approved_at,
    categories, assigned_agent_ids, created_at, updated_at
"#;

fn row_to_account(r: &PgRow) -> Result<Account, Error> {
    let role: String = r.try_get("role")?;
    let status: String = r.try_get("status")?;
    let rejected_at: Option<DateTime<Utc>> = r.try_get("rejected_at")?;

    // Rejection metadata travels as three nullable columns; rejected_at is
    // the presence marker.
    let rejection = rejected_at.map(|at| -> Result<Rejection, Error> {
        Ok(Rejection {
            reason: r.try_get("rejection_reason")?,
            rejected_at: at,
            rejected_by: r.try_get("rejected_by")?,
        })
    });

    Ok(Account {
        account_id: r.try_get("account_id")?,
        email: r.try_get("email")?,
        display_name: r.try_get("display_name")?,
        role: Role::from_str(&role).map_err(Error::Parse)?,
        status: ApprovalStatus::from_str(&status).map_err(Error::Parse)?,
        rejection: rejection.transpose()?,
        approved_at: r.try_get("approved_at")?,
        categories: r.try_get("categories")?,
        assigned_agent_ids: r.try_get("assigned_agent_ids")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn create(&self, account: &Account) -> Result<(), Error> {
        let (reason, rejected_at, rejected_by) = match &account.rejection {
            Some(rj) => (rj.reason.clone(), Some(rj.rejected_at), rj.rejected_by),
            None => (None, None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id, email, display_name, role, status,
                rejection_reason, rejected_at, rejected_by, approved_at,
                categories, assigned_agent_ids, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(account.account_id)
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(account.role.to_string())
        .bind(account.status.to_string())
        .bind(&reason)
        .bind(rejected_at)
        .bind(rejected_by)
        .bind(account.approved_at)
        .bind(&account.categories)
        .bind(&account.assigned_agent_ids)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, account_id: Uuid) -> Result<Option<Account>, Error> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1"
        ))
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_account).transpose()
    }

    async fn update(&self, account: &Account) -> Result<(), Error> {
        let (reason, rejected_at, rejected_by) = match &account.rejection {
            Some(rj) => (rj.reason.clone(), Some(rj.rejected_at), rj.rejected_by),
            None => (None, None, None),
        };

        // role is immutable post-creation and deliberately absent here
        sqlx::query(
            r#"
            UPDATE accounts
            SET email              = $1,
                display_name       = $2,
                status             = $3,
                rejection_reason   = $4,
                rejected_at        = $5,
                rejected_by        = $6,
                approved_at        = $7,
                categories         = $8,
                assigned_agent_ids = $9,
                updated_at         = $10
            WHERE account_id = $11
            "#,
        )
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(account.status.to_string())
        .bind(&reason)
        .bind(rejected_at)
        .bind(rejected_by)
        .bind(account.approved_at)
        .bind(&account.categories)
        .bind(&account.assigned_agent_ids)
        .bind(account.updated_at)
        .bind(account.account_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM accounts WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, Error> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE role = $1 ORDER BY created_at ASC"
        ))
        .bind(role.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_account).collect()
    }

    async fn list_by_role_and_status(
        &self,
        role: Role,
        status: ApprovalStatus,
    ) -> Result<Vec<Account>, Error> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE role = $1 AND status = $2
            ORDER BY created_at ASC
            "#
        ))
        .bind(role.to_string())
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_account).collect()
    }

    async fn set_categories(&self, account_id: Uuid, categories: &[String]) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET categories = $1,
                updated_at = $2
            WHERE account_id = $3
            "#,
        )
        .bind(categories)
        .bind(Utc::now())
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_assigned_agent(&self, candidate_id: Uuid, agent_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET assigned_agent_ids = array_append(assigned_agent_ids, $1),
                updated_at = $2
            WHERE account_id = $3
              AND NOT ($1 = ANY(assigned_agent_ids))
            "#,
        )
        .bind(agent_id)
        .bind(Utc::now())
        .bind(candidate_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_assigned_agent(
        &self,
        candidate_id: Uuid,
        agent_id: Uuid,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE accounts
            SET assigned_agent_ids = array_remove(assigned_agent_ids, $1),
                updated_at = $2
            WHERE account_id = $3
            "#,
        )
        .bind(agent_id)
        .bind(Utc::now())
        .bind(candidate_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
