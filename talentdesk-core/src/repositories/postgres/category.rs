// src/repositories/postgres/category.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};

use talentdesk_common::models::category::{Category, CategoryScope};
pub use talentdesk_common::traits::repository_traits::CategoryRepository;

use crate::Error;

#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: Pool<Postgres>,
}

impl PostgresCategoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn add(&self, scope: CategoryScope, name: &str) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO categories (scope, name, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(scope.to_string())
        .bind(name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn exists(&self, scope: CategoryScope, name: &str) -> Result<bool, Error> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS present
            FROM categories
            WHERE scope = $1 AND name = $2
            "#,
        )
        .bind(scope.to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn remove(&self, scope: CategoryScope, name: &str) -> Result<(), Error> {
        sqlx::query("DELETE FROM categories WHERE scope = $1 AND name = $2")
            .bind(scope.to_string())
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, scope: CategoryScope) -> Result<Vec<Category>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT name, created_at
            FROM categories
            WHERE scope = $1
            ORDER BY name ASC
            "#,
        )
        .bind(scope.to_string())
        .fetch_all(&self.pool)
        .await?;

        let mut results = Vec::new();
        for r in rows {
            results.push(Category {
                scope,
                name: r.try_get("name")?,
                created_at: r.try_get("created_at")?,
            });
        }
        Ok(results)
    }
}
