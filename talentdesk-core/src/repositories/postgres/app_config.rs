// src/repositories/postgres/app_config.rs

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

pub use talentdesk_common::traits::repository_traits::AppConfigRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresAppConfigRepository {
    pool: Pool<Postgres>,
}

impl PostgresAppConfigRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppConfigRepository for PostgresAppConfigRepository {
    async fn set_value(&self, config_key: &str, config_value: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO app_config (config_key, config_value)
            VALUES ($1, $2)
            ON CONFLICT (config_key)
            DO UPDATE SET
               config_value = EXCLUDED.config_value
            "#,
        )
        .bind(config_key)
        .bind(config_value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_value(&self, config_key: &str) -> Result<Option<String>, Error> {
        let row = sqlx::query(
            r#"
            SELECT config_value
            FROM app_config
            WHERE config_key = $1
            "#,
        )
        .bind(config_key)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(r) = row {
            Ok(Some(r.try_get("config_value")?))
        } else {
            Ok(None)
        }
    }

    async fn delete_value(&self, config_key: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM app_config WHERE config_key = $1")
            .bind(config_key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT config_key, config_value
            FROM app_config
            ORDER BY config_key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::new();
        for r in rows {
            results.push((r.try_get("config_key")?, r.try_get("config_value")?));
        }
        Ok(results)
    }
}
