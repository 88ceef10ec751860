// tests/lifecycle_tests.rs

use std::sync::Arc;

use uuid::Uuid;

use talentdesk_core::{
    cache::AccountCache,
    eventbus::EventBus,
    models::{Account, AgentProfile, ApprovalStatus, Assignment, AssignmentStatus, Role},
    services::AccountLifecycleService,
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
    profiles: Arc<dyn AgentProfileRepository + Send + Sync>,
    assignments: Arc<dyn AssignmentRepository + Send + Sync>,
    audit: Arc<dyn AccountAuditLogRepository + Send + Sync>,
    service: AccountLifecycleService,
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

    let service = AccountLifecycleService::new(
        accounts.clone(),
        profiles.clone(),
        assignments.clone(),
        audit.clone(),
        event_bus,
        cache,
    );

    Harness {
        accounts,
        profiles,
        assignments,
        audit,
        service,
    }
}

async fn seed(h: &Harness, role: Role, email: &str) -> Uuid {
    let account = Account::new(role, email, Some("Test User"));
    h.accounts.create(&account).await.unwrap();
    account.account_id
}

#[tokio::test]
async fn test_approve_is_idempotent() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;

    let approved = h.service.approve(candidate, admin).await?;
    assert_eq!(approved.status, ApprovalStatus::Approved);
    assert!(approved.rejection.is_none());
    let first_approved_at = approved.approved_at.expect("approved_at should be set");

    // re-applying approve is a no-op, not an error
    let again = h.service.approve(candidate, admin).await?;
    assert_eq!(again.status, ApprovalStatus::Approved);
    assert_eq!(again.approved_at, Some(first_approved_at));

    Ok(())
}

#[tokio::test]
async fn test_rejection_metadata_present_iff_rejected() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;

    let rejected = h
        .service
        .reject(candidate, admin, Some("Incomplete profile"))
        .await?;
    assert_eq!(rejected.status, ApprovalStatus::Rejected);
    let rejection = rejected.rejection.expect("rejection metadata should exist");
    assert_eq!(rejection.reason.as_deref(), Some("Incomplete profile"));
    assert_eq!(rejection.rejected_by, Some(admin));
    assert!(rejected.approved_at.is_none());

    // moving away from rejected clears the metadata
    let approved = h.service.approve(candidate, admin).await?;
    assert_eq!(approved.status, ApprovalStatus::Approved);
    assert!(approved.rejection.is_none());

    Ok(())
}

#[tokio::test]
async fn test_reject_unreject_reject_most_recent_reason_wins() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;

    h.service.reject(candidate, admin, Some("spam")).await?;

    let pending = h.service.unreject(candidate, admin).await?;
    assert_eq!(pending.status, ApprovalStatus::Pending);
    assert!(pending.rejection.is_none());

    let rejected = h.service.reject(candidate, admin, Some("fraud")).await?;
    assert_eq!(rejected.status, ApprovalStatus::Rejected);
    assert_eq!(
        rejected.rejection.unwrap().reason.as_deref(),
        Some("fraud")
    );

    Ok(())
}

#[tokio::test]
async fn test_reject_when_already_rejected_keeps_original_metadata() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;

    h.service.reject(candidate, admin, Some("spam")).await?;
    // a retried click must not clobber the recorded reason
    let still_rejected = h.service.reject(candidate, admin, Some("other")).await?;
    assert_eq!(
        still_rejected.rejection.unwrap().reason.as_deref(),
        Some("spam")
    );

    Ok(())
}

#[tokio::test]
async fn test_unreject_from_approved_is_invalid() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;

    h.service.approve(candidate, admin).await?;
    let err = h.service.unreject(candidate, admin).await.unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));

    // unreject of an already-pending account is a safe no-op
    let other = seed(&h, Role::Candidate, "cand2@example.com").await;
    let pending = h.service.unreject(other, admin).await?;
    assert_eq!(pending.status, ApprovalStatus::Pending);

    Ok(())
}

#[tokio::test]
async fn test_mutations_require_admin() -> Result<(), Error> {
    let h = setup();
    let outsider = seed(&h, Role::Agent, "agent@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;

    let err = h.service.approve(candidate, outsider).await.unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)));

    let err = h
        .service
        .reject(candidate, outsider, Some("nope"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PermissionDenied(_)));

    Ok(())
}

#[tokio::test]
async fn test_approve_unknown_account_is_not_found() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;

    let err = h
        .service
        .approve(Uuid::new_v4(), admin)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_approve_refreshes_agent_profile_mirror() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let agent = seed(&h, Role::Agent, "agent@example.com").await;
    h.profiles.upsert(&AgentProfile::new(agent)).await?;

    h.service.approve(agent, admin).await?;
    let profile = h.profiles.get(agent).await?.unwrap();
    assert_eq!(profile.verification_status, ApprovalStatus::Approved);

    h.service.reject(agent, admin, None).await?;
    let profile = h.profiles.get(agent).await?.unwrap();
    assert_eq!(profile.verification_status, ApprovalStatus::Rejected);

    Ok(())
}

#[tokio::test]
async fn test_delete_cascades_to_assignments() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;
    let agent = seed(&h, Role::Agent, "agent@example.com").await;

    h.assignments
        .create(&Assignment::new(candidate, agent, admin))
        .await?;
    h.accounts.add_assigned_agent(candidate, agent).await?;

    h.service.delete(agent, admin).await?;

    assert!(h.accounts.get(agent).await?.is_none());
    // the ledger row survives as an inactive audit record
    let row = h.assignments.get_by_pair(candidate, agent).await?.unwrap();
    assert_eq!(row.status, AssignmentStatus::Removed);

    // deleting again is a no-op
    h.service.delete(agent, admin).await?;

    Ok(())
}

#[tokio::test]
async fn test_transitions_are_audited() -> Result<(), Error> {
    let h = setup();
    let admin = seed(&h, Role::Admin, "admin@example.com").await;
    let candidate = seed(&h, Role::Candidate, "cand@example.com").await;

    h.service.reject(candidate, admin, Some("spam")).await?;
    h.service.unreject(candidate, admin).await?;
    h.service.approve(candidate, admin).await?;

    let entries = h.audit.entries_for_account(candidate, 10).await?;
    let mut types: Vec<String> = entries.iter().map(|e| e.event_type.clone()).collect();
    types.sort();
    assert_eq!(
        types,
        vec![
            "account.approved".to_string(),
            "account.rejected".to_string(),
            "account.unrejected".to_string(),
        ]
    );
    assert!(entries.iter().all(|e| e.changed_by == Some(admin)));

    Ok(())
}

#[tokio::test]
async fn test_legacy_flag_pair_normalization() {
    assert_eq!(
        ApprovalStatus::from_flags(false, false),
        ApprovalStatus::Pending
    );
    assert_eq!(
        ApprovalStatus::from_flags(true, false),
        ApprovalStatus::Approved
    );
    assert_eq!(
        ApprovalStatus::from_flags(false, true),
        ApprovalStatus::Rejected
    );
    // a disagreeing pair normalizes to rejected
    assert_eq!(
        ApprovalStatus::from_flags(true, true),
        ApprovalStatus::Rejected
    );
}
