// src/repositories/postgres/assignment.rs

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use talentdesk_common::models::assignment::{Assignment, AssignmentStatus};
pub use talentdesk_common::traits::repository_traits::AssignmentRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresAssignmentRepository {
    pool: Pool<Postgres>,
}

impl PostgresAssignmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_assignment(r: &PgRow) -> Result<Assignment, Error> {
    let status: String = r.try_get("status")?;
    Ok(Assignment {
        assignment_id: r.try_get("assignment_id")?,
        candidate_id: r.try_get("candidate_id")?,
        agent_id: r.try_get("agent_id")?,
        assigned_by: r.try_get("assigned_by")?,
        status: AssignmentStatus::from_str(&status).map_err(Error::Parse)?,
        assigned_at: r.try_get("assigned_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn create(&self, assignment: &Assignment) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO assignments (
                assignment_id, candidate_id, agent_id, assigned_by,
                status, assigned_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(assignment.assignment_id)
        .bind(assignment.candidate_id)
        .bind(assignment.agent_id)
        .bind(assignment.assigned_by)
        .bind(assignment.status.to_string())
        .bind(assignment.assigned_at)
        .bind(assignment.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, assignment_id: Uuid) -> Result<Option<Assignment>, Error> {
        let row = sqlx::query(
            r#"
            SELECT assignment_id, candidate_id, agent_id, assigned_by,
                   status, assigned_at, updated_at
            FROM assignments
            WHERE assignment_id = $1
            "#,
        )
        .bind(assignment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_assignment).transpose()
    }

    async fn get_by_pair(
        &self,
        candidate_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Option<Assignment>, Error> {
        let row = sqlx::query(
            r#"
            SELECT assignment_id, candidate_id, agent_id, assigned_by,
                   status, assigned_at, updated_at
            FROM assignments
            WHERE candidate_id = $1 AND agent_id = $2
            "#,
        )
        .bind(candidate_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_assignment).transpose()
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE assignments
            SET assigned_by = $1,
                status      = $2,
                assigned_at = $3,
                updated_at  = $4
            WHERE assignment_id = $5
            "#,
        )
        .bind(assignment.assigned_by)
        .bind(assignment.status.to_string())
        .bind(assignment.assigned_at)
        .bind(assignment.updated_at)
        .bind(assignment.assignment_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_status(
        &self,
        assignment_id: Uuid,
        status: AssignmentStatus,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE assignments
            SET status = $1,
                updated_at = $2
            WHERE assignment_id = $3
            "#,
        )
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(assignment_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Assignment>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT assignment_id, candidate_id, agent_id, assigned_by,
                   status, assigned_at, updated_at
            FROM assignments
            WHERE candidate_id = $1
            ORDER BY assigned_at ASC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_assignment).collect()
    }

    async fn list_for_agent(&self, agent_id: Uuid) -> Result<Vec<Assignment>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT assignment_id, candidate_id, agent_id, assigned_by,
                   status, assigned_at, updated_at
            FROM assignments
            WHERE agent_id = $1
            ORDER BY assigned_at ASC
            "#,
        )
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_assignment).collect()
    }

    async fn remove_all_for_account(&self, account_id: Uuid) -> Result<u64, Error> {
        let result = sqlx::query(
            r#"
            UPDATE assignments
            SET status = 'removed',
                updated_at = $1
            WHERE (candidate_id = $2 OR agent_id = $2)
              AND status = 'active'
            "#,
        )
        .bind(Utc::now())
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
