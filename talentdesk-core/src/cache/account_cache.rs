// File: src/cache/account_cache.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use talentdesk_common::models::account::Account;
use talentdesk_common::traits::repository_traits::AccountRepository;

use crate::Error;

#[derive(Debug, Clone)]
struct CachedAccount {
    account: Account,
    last_access: DateTime<Utc>,
}

/// Read-through TTL cache for account lookups on the hot dashboard paths.
/// Every lifecycle/assignment mutation must invalidate the ids it touched.
pub struct AccountCache {
    repo: Arc<dyn AccountRepository + Send + Sync>,
    entries: DashMap<Uuid, CachedAccount>,
    max_age_secs: i64,
}

const CACHE_MAX_AGE_SECS: i64 = 300;

impl AccountCache {
    pub fn new(repo: Arc<dyn AccountRepository + Send + Sync>) -> Self {
        Self::with_max_age(repo, CACHE_MAX_AGE_SECS)
    }

    pub fn with_max_age(repo: Arc<dyn AccountRepository + Send + Sync>, max_age_secs: i64) -> Self {
        Self {
            repo,
            entries: DashMap::new(),
            max_age_secs,
        }
    }

    /// Cache-first account lookup.
    pub async fn get(&self, account_id: Uuid) -> Result<Option<Account>, Error> {
        self.prune();

        if let Some(mut entry) = self.entries.get_mut(&account_id) {
            entry.last_access = Utc::now();
            return Ok(Some(entry.account.clone()));
        }

        let fetched = self.repo.get(account_id).await?;
        if let Some(ref account) = fetched {
            self.entries.insert(
                account_id,
                CachedAccount {
                    account: account.clone(),
                    last_access: Utc::now(),
                },
            );
        }
        Ok(fetched)
    }

    pub fn invalidate(&self, account_id: Uuid) {
        self.entries.remove(&account_id);
    }

    pub fn prune(&self) {
        let now = Utc::now();
        let mut to_remove = Vec::new();
        for entry in self.entries.iter() {
            let age = now.signed_duration_since(entry.value().last_access);
            if age.num_seconds() >= self.max_age_secs {
                to_remove.push(*entry.key());
            }
        }
        for key in to_remove {
            self.entries.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Test helper
    pub fn test_force_last_access(&self, account_id: Uuid, secs_ago: i64) -> bool {
        if let Some(mut entry) = self.entries.get_mut(&account_id) {
            entry.last_access = Utc::now() - chrono::Duration::seconds(secs_ago);
            true
        } else {
            false
        }
    }
}
