use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use talentdesk_common::models::category::CategoryScope;
use talentdesk_common::traits::repository_traits::{AccountRepository, CategoryRepository};

use crate::cache::AccountCache;
use crate::Error;

/// Free-form label sets per admin surface, plus the per-account tags.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository + Send + Sync>,
    accounts: Arc<dyn AccountRepository + Send + Sync>,
    cache: Arc<AccountCache>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository + Send + Sync>,
        accounts: Arc<dyn AccountRepository + Send + Sync>,
        cache: Arc<AccountCache>,
    ) -> Self {
        Self {
            categories,
            accounts,
            cache,
        }
    }

    /// Duplicate check is case-sensitive over the trimmed name.
    pub async fn add_category(&self, scope: CategoryScope, name: &str) -> Result<(), Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Parse("category name is empty".to_string()));
        }
        if self.categories.exists(scope, name).await? {
            return Err(Error::DuplicateCategory(name.to_string()));
        }
        self.categories.add(scope, name).await?;
        info!("category '{}' added to {} scope", name, scope);
        Ok(())
    }

    /// Accounts already tagged with the label keep it; stale tags are
    /// tolerated everywhere, never errors.
    pub async fn remove_category(&self, scope: CategoryScope, name: &str) -> Result<(), Error> {
        self.categories.remove(scope, name.trim()).await
    }

    pub async fn list_categories(&self, scope: CategoryScope) -> Result<Vec<String>, Error> {
        let categories = self.categories.list(scope).await?;
        Ok(categories.into_iter().map(|c| c.name).collect())
    }

    /// Wholesale replacement of the account's tag set (not a merge). The
    /// input is deduplicated preserving first occurrence; names are not
    /// validated against the scope's available set.
    pub async fn set_categories_for(
        &self,
        account_id: Uuid,
        names: &[String],
    ) -> Result<(), Error> {
        if self.accounts.get(account_id).await?.is_none() {
            return Err(Error::NotFound(format!("account {}", account_id)));
        }

        let mut deduped: Vec<String> = Vec::new();
        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() || deduped.iter().any(|c| c == trimmed) {
                continue;
            }
            deduped.push(trimmed.to_string());
        }

        self.accounts.set_categories(account_id, &deduped).await?;
        self.cache.invalidate(account_id);
        Ok(())
    }
}
