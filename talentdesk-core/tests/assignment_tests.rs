// tests/assignment_tests.rs

use std::sync::Arc;

use uuid::Uuid;

use talentdesk_core::{
    cache::AccountCache,
    eventbus::EventBus,
    models::{Account, ApprovalStatus, AssignmentStatus, Role},
    services::{AccountLifecycleService, AssignmentService},
    test_utils::memory::{
        MemoryAccountAuditLogRepository, MemoryAccountRepository, MemoryAgentProfileRepository,
        MemoryAssignmentRepository,
    },
    traits::repository_traits::{
        AccountAuditLogRepository, AccountRepository, AgentProfileRepository, AssignmentRepository,
    },
    Error,
};

struct Harness {
    accounts: Arc<dyn AccountRepository + Send + Sync>,
    assignments: Arc<dyn AssignmentRepository + Send + Sync>,
    service: AssignmentService,
    lifecycle: AccountLifecycleService,
}

fn setup() -> Harness {
    let accounts: Arc<dyn AccountRepository + Send + Sync> =
        Arc::new(MemoryAccountRepository::new());
    let profiles: Arc<dyn AgentProfileRepository + Send + Sync> =
        Arc::new(MemoryAgentProfileRepository::new());
    let assignments: Arc<dyn AssignmentRepository + Send + Sync> =
        Arc::new(MemoryAssignmentRepository::new());
    let audit: Arc<dyn AccountAuditLogRepository + Send + Sync> =
        Arc::new(MemoryAccountAuditLogRepository::new());
    let event_bus = Arc::new(EventBus::new());
    let cache = Arc::new(AccountCache::new(accounts.clone()));

    let service = AssignmentService::new(
        accounts.clone(),
        assignments.clone(),
        audit.clone(),
        event_bus.clone(),
        cache.clone(),
    );
    let lifecycle = AccountLifecycleService::new(
        accounts.clone(),
        profiles,
        assignments.clone(),
        audit,
        event_bus,
        cache,
    );

    Harness {
        accounts,
        assignments,
        service,
        lifecycle,
    }
}

async fn seed(h: &Harness, role: Role, email: &str) -> Uuid {
    let account = Account::new(role, email, Some("Test User"));
    h.accounts.create(&account).await.unwrap();
    account.account_id
}

async fn seed_approved_agent(h: &Harness, email: &str) -> Uuid {
    let mut agent = Account::new(Role::Agent, email, Some("Agent"));
    agent.mark_approved();
    h.accounts.create(&agent).await.unwrap();
    agent.account_id
}

#[tokio::test]
async fn test_assign_links_pair() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let agent = seed_approved_agent(&h, "agent@example.com").await;

    let assignment = h.service.assign(candidate, agent, admin).await?;
    assert_eq!(assignment.status, AssignmentStatus::Active);
    assert_eq!(assignment.assigned_by, admin);

    let stored = h.accounts.get(candidate).await?.unwrap();
    assert_eq!(stored.assigned_agent_ids, vec![agent]);

    Ok(())
}

#[tokio::test]
async fn test_assign_twice_fails_without_duplicating() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let agent = seed_approved_agent(&h, "agent@example.com").await;

    h.service.assign(candidate, agent, admin).await?;
    let err = h.service.assign(candidate, agent, admin).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyAssigned(_)));

    let stored = h.accounts.get(candidate).await?.unwrap();
    assert_eq!(stored.assigned_agent_ids.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_unassign_then_listing_excludes_agent() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let agent = seed_approved_agent(&h, "agent@example.com").await;

    h.service.assign(candidate, agent, admin).await?;
    h.service.unassign(candidate, agent, admin).await?;

    let listed = h.service.list_agents_for(candidate).await?;
    assert!(listed.is_empty());

    let stored = h.accounts.get(candidate).await?.unwrap();
    assert!(stored.assigned_agent_ids.is_empty());

    // the ledger keeps the pair as an inactive audit record
    let row = h.assignments.get_by_pair(candidate, agent).await?.unwrap();
    assert_eq!(row.status, AssignmentStatus::Removed);

    // unassigning again is a safe repair, not an error
    h.service.unassign(candidate, agent, admin).await?;

    Ok(())
}

#[tokio::test]
async fn test_reassign_after_unassign_reactivates_pair() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let agent = seed_approved_agent(&h, "agent@example.com").await;

    let first = h.service.assign(candidate, agent, admin).await?;
    h.service.unassign(candidate, agent, admin).await?;
    let second = h.service.assign(candidate, agent, admin).await?;

    // same ledger row revived, not a duplicate
    assert_eq!(first.assignment_id, second.assignment_id);
    assert_eq!(second.status, AssignmentStatus::Active);

    let listed = h.service.list_agents_for(candidate).await?;
    assert_eq!(listed.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_listing_filters_out_unapproved_agents() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let good_agent = seed_approved_agent(&h, "good@example.com").await;
    let bad_agent = seed_approved_agent(&h, "bad@example.com").await;

    h.service.assign(candidate, good_agent, admin).await?;
    h.service.assign(candidate, bad_agent, admin).await?;

    // simulate a stale cascade: agent rejected but still listed
    h.lifecycle.reject(bad_agent, admin, Some("fraud")).await?;

    let listed = h.service.list_agents_for(candidate).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].account_id, good_agent);
    assert_eq!(listed[0].status, ApprovalStatus::Approved);

    Ok(())
}

#[tokio::test]
async fn test_listing_survives_deleted_agent() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let agent = seed_approved_agent(&h, "agent@example.com").await;

    h.service.assign(candidate, agent, admin).await?;
    h.lifecycle.delete(agent, admin).await?;

    // the candidate's raw list may still hold the id; the read filters it
    let listed = h.service.list_agents_for(candidate).await?;
    assert!(listed.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_assign_enforces_roles_and_admin() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let other_candidate = seed(&h, Role::Candidate, "cand2@example.com").await;
    let agent = seed_approved_agent(&h, "agent@example.com").await;

    let err = h
        .service
        .assign(candidate, other_candidate, admin)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Role(_)));

    let err = h
        .service
        .assign(agent, candidate, admin)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Role(_)));

    let err = h
        .service
        .assign(candidate, agent, candidate)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)));

    Ok(())
}

#[tokio::test]
async fn test_ledger_reads_for_admin_view() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let agent_a = seed_approved_agent(&h, "a@example.com").await;
    let agent_b = seed_approved_agent(&h, "b@example.com").await;

    h.service.assign(candidate, agent_a, admin).await?;
    h.service.assign(candidate, agent_b, admin).await?;

    let for_candidate = h.service.assignments_for_candidate(candidate).await?;
    assert_eq!(for_candidate.len(), 2);

    let for_agent = h.service.assignments_for_agent(agent_a).await?;
    assert_eq!(for_agent.len(), 1);
    assert_eq!(for_agent[0].candidate_id, candidate);

    Ok(())
}
