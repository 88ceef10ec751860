// src/repositories/postgres/agent_profile.rs

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use talentdesk_common::models::account::ApprovalStatus;
use talentdesk_common::models::agent_profile::{AgentProfile, WorkingHours};
pub use talentdesk_common::traits::repository_traits::AgentProfileRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresAgentProfileRepository {
    pool: Pool<Postgres>,
}

impl PostgresAgentProfileRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentProfileRepository for PostgresAgentProfileRepository {
    async fn upsert(&self, profile: &AgentProfile) -> Result<(), Error> {
        let (hours_start, hours_end) = match &profile.working_hours {
            Some(wh) => (Some(wh.start.clone()), Some(wh.end.clone())),
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO agent_profiles (
                account_id, services, prices, percentage_charge, one_time_fee,
                working_hours_start, working_hours_end,
                success_rate, total_clients, rating,
                credentials_url, verification_status, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (account_id)
            DO UPDATE SET
                services            = EXCLUDED.services,
                prices              = EXCLUDED.prices,
                percentage_charge   = EXCLUDED.percentage_charge,
                one_time_fee        = EXCLUDED.one_time_fee,
                working_hours_start = EXCLUDED.working_hours_start,
                working_hours_end   = EXCLUDED.working_hours_end,
                success_rate        = EXCLUDED.success_rate,
                total_clients       = EXCLUDED.total_clients,
                rating              = EXCLUDED.rating,
                credentials_url     = EXCLUDED.credentials_url,
                verification_status = EXCLUDED.verification_status,
                updated_at          = EXCLUDED.updated_at
            "#,
        )
        .bind(profile.account_id)
        .bind(&profile.services)
        .bind(Json(&profile.prices))
        .bind(profile.percentage_charge)
        .bind(profile.one_time_fee)
        .bind(hours_start)
        .bind(hours_end)
        .bind(profile.success_rate)
        .bind(profile.total_clients)
        .bind(profile.rating)
        .bind(&profile.credentials_url)
        .bind(profile.verification_status.to_string())
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, account_id: Uuid) -> Result<Option<AgentProfile>, Error> {
        let row = sqlx::query(
            r#"
            SELECT
                account_id, services, prices, percentage_charge, one_time_fee,
                working_hours_start, working_hours_end,
                success_rate, total_clients, rating,
                credentials_url, verification_status, updated_at
            FROM agent_profiles
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(r) = row {
            let status: String = r.try_get("verification_status")?;
            let hours_start: Option<String> = r.try_get("working_hours_start")?;
            let hours_end: Option<String> = r.try_get("working_hours_end")?;
            let working_hours = match (hours_start, hours_end) {
                (Some(start), Some(end)) => Some(WorkingHours { start, end }),
                _ => None,
            };

            Ok(Some(AgentProfile {
                account_id: r.try_get("account_id")?,
                services: r.try_get("services")?,
                prices: r.try_get::<Json<HashMap<String, f64>>, _>("prices")?.0,
                percentage_charge: r.try_get("percentage_charge")?,
                one_time_fee: r.try_get("one_time_fee")?,
                working_hours,
                success_rate: r.try_get("success_rate")?,
                total_clients: r.try_get("total_clients")?,
                rating: r.try_get("rating")?,
                credentials_url: r.try_get("credentials_url")?,
                verification_status: ApprovalStatus::from_str(&status).map_err(Error::Parse)?,
                updated_at: r.try_get("updated_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    async fn set_verification_status(
        &self,
        account_id: Uuid,
        status: ApprovalStatus,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE agent_profiles
            SET verification_status = $1,
                updated_at = $2
            WHERE account_id = $3
            "#,
        )
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_stats(
        &self,
        account_id: Uuid,
        success_rate: f64,
        total_clients: i32,
        rating: f64,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE agent_profiles
            SET success_rate = $1,
                total_clients = $2,
                rating = $3,
                updated_at = $4
            WHERE account_id = $5
            "#,
        )
        .bind(success_rate)
        .bind(total_clients)
        .bind(rating)
        .bind(Utc::now())
        .bind(account_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<(), Error> {
        sqlx::query("DELETE FROM agent_profiles WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
