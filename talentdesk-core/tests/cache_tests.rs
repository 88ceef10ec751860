// tests/cache_tests.rs

use std::sync::Arc;

use uuid::Uuid;

use talentdesk_core::{
    cache::AccountCache,
    models::{Account, ApprovalStatus, Role},
    test_utils::memory::MemoryAccountRepository,
    traits::repository_traits::AccountRepository,
    Error,
};

fn setup() -> (Arc<dyn AccountRepository + Send + Sync>, AccountCache) {
    let repo: Arc<dyn AccountRepository + Send + Sync> = Arc::new(MemoryAccountRepository::new());
    let cache = AccountCache::new(repo.clone());
    (repo, cache)
}

async fn seed(repo: &Arc<dyn AccountRepository + Send + Sync>) -> Account {
    let account = Account::new(Role::Candidate, "cand@example.com", Some("Cand"));
    repo.create(&account).await.unwrap();
    account
}

#[tokio::test]
async fn test_read_through_and_cache_hit() -> Result<(), Error> {
    let (repo, cache) = setup();
    let account = seed(&repo).await;

    assert!(cache.is_empty());
    let first = cache.get(account.account_id).await?.unwrap();
    assert_eq!(first.status, ApprovalStatus::Pending);
    assert_eq!(cache.len(), 1);

    // a repo write that bypasses invalidation is not seen by the cache
    let mut changed = account.clone();
    changed.mark_approved();
    repo.update(&changed).await?;

    let stale = cache.get(account.account_id).await?.unwrap();
    assert_eq!(stale.status, ApprovalStatus::Pending);

    // invalidation forces the fresh read
    cache.invalidate(account.account_id);
    let fresh = cache.get(account.account_id).await?.unwrap();
    assert_eq!(fresh.status, ApprovalStatus::Approved);

    Ok(())
}

#[tokio::test]
async fn test_expired_entries_are_pruned() -> Result<(), Error> {
    let (repo, cache) = setup();
    let account = seed(&repo).await;

    cache.get(account.account_id).await?;
    assert!(cache.test_force_last_access(account.account_id, 3600));

    let mut changed = account.clone();
    changed.mark_rejected(Some("stale"), None);
    repo.update(&changed).await?;

    // the aged entry is discarded on the next access
    let fresh = cache.get(account.account_id).await?.unwrap();
    assert_eq!(fresh.status, ApprovalStatus::Rejected);

    Ok(())
}

#[tokio::test]
async fn test_missing_accounts_are_not_cached() -> Result<(), Error> {
    let (_repo, cache) = setup();

    assert!(cache.get(Uuid::new_v4()).await?.is_none());
    assert!(cache.is_empty());

    Ok(())
}
