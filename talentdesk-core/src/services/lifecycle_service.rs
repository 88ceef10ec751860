use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use talentdesk_common::models::account::{Account, AccountAuditLogEntry, ApprovalStatus, Role};
use talentdesk_common::traits::repository_traits::{
    AccountAuditLogRepository, AccountRepository, AgentProfileRepository, AssignmentRepository,
};

use crate::cache::AccountCache;
use crate::eventbus::{DeskEvent, EventBus};
use crate::services::require_admin;
use crate::Error;

/// The account state machine: pending -> approved/rejected and back, plus
/// deletion. Every transition is idempotent so a caller-driven retry is
/// always safe.
pub struct AccountLifecycleService {
    accounts: Arc<dyn AccountRepository + Send + Sync>,
    profiles: Arc<dyn AgentProfileRepository + Send + Sync>,
    assignments: Arc<dyn AssignmentRepository + Send + Sync>,
    audit: Arc<dyn AccountAuditLogRepository + Send + Sync>,
    event_bus: Arc<EventBus>,
    cache: Arc<AccountCache>,
}

impl AccountLifecycleService {
    pub fn new(
        accounts: Arc<dyn AccountRepository + Send + Sync>,
        profiles: Arc<dyn AgentProfileRepository + Send + Sync>,
        assignments: Arc<dyn AssignmentRepository + Send + Sync>,
        audit: Arc<dyn AccountAuditLogRepository + Send + Sync>,
        event_bus: Arc<EventBus>,
        cache: Arc<AccountCache>,
    ) -> Self {
        Self {
            accounts,
            profiles,
            assignments,
            audit,
            event_bus,
            cache,
        }
    }

    /// Cache-first read used by dashboards.
    pub async fn get_account(&self, account_id: Uuid) -> Result<Option<Account>, Error> {
        self.cache.get(account_id).await
    }

    pub async fn approve(&self, account_id: Uuid, admin_id: Uuid) -> Result<Account, Error> {
        require_admin(&self.accounts, admin_id).await?;

        let mut account = self
            .accounts
            .get(account_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("account {}", account_id)))?;

        if account.status == ApprovalStatus::Approved {
            debug!("approve: account {} already approved", account_id);
            return Ok(account);
        }

        let old_status = account.status;
        account.mark_approved();
        self.accounts.update(&account).await?;

        // The account row is authoritative; the profile mirror may lag if
        // this write fails, and readers re-validate against the account.
        if account.role == Role::Agent {
            self.profiles
                .set_verification_status(account_id, ApprovalStatus::Approved)
                .await?;
        }

        self.cache.invalidate(account_id);
        self.audit
            .insert_entry(&AccountAuditLogEntry::new(
                account_id,
                "account.approved",
                Some(&old_status.to_string()),
                Some("approved"),
                Some(admin_id),
                None,
            ))
            .await?;
        self.event_bus
            .publish(DeskEvent::LifecycleChanged {
                account_id,
                role: account.role,
                old_status,
                new_status: account.status,
                changed_by: admin_id,
                timestamp: Utc::now(),
            })
            .await;

        info!("account {} approved by {}", account_id, admin_id);
        Ok(account)
    }

    pub async fn reject(
        &self,
        account_id: Uuid,
        admin_id: Uuid,
        reason: Option<&str>,
    ) -> Result<Account, Error> {
        require_admin(&self.accounts, admin_id).await?;

        let mut account = self
            .accounts
            .get(account_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("account {}", account_id)))?;

        if account.status == ApprovalStatus::Rejected {
            // retried click: keep the original rejection metadata
            debug!("reject: account {} already rejected", account_id);
            return Ok(account);
        }

        let old_status = account.status;
        account.mark_rejected(reason, Some(admin_id));
        self.accounts.update(&account).await?;

        if account.role == Role::Agent {
            self.profiles
                .set_verification_status(account_id, ApprovalStatus::Rejected)
                .await?;
        }

        self.cache.invalidate(account_id);
        self.audit
            .insert_entry(&AccountAuditLogEntry::new(
                account_id,
                "account.rejected",
                Some(&old_status.to_string()),
                Some("rejected"),
                Some(admin_id),
                reason,
            ))
            .await?;
        self.event_bus
            .publish(DeskEvent::LifecycleChanged {
                account_id,
                role: account.role,
                old_status,
                new_status: account.status,
                changed_by: admin_id,
                timestamp: Utc::now(),
            })
            .await;

        info!("account {} rejected by {}", account_id, admin_id);
        Ok(account)
    }

    pub async fn unreject(&self, account_id: Uuid, admin_id: Uuid) -> Result<Account, Error> {
        require_admin(&self.accounts, admin_id).await?;

        let mut account = self
            .accounts
            .get(account_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("account {}", account_id)))?;

        match account.status {
            ApprovalStatus::Pending => {
                debug!("unreject: account {} already pending", account_id);
                return Ok(account);
            }
            ApprovalStatus::Approved => {
                return Err(Error::InvalidTransition(format!(
                    "account {} is approved; only a rejected account can be unrejected",
                    account_id
                )));
            }
            ApprovalStatus::Rejected => {}
        }

        account.clear_rejection();
        self.accounts.update(&account).await?;

        if account.role == Role::Agent {
            self.profiles
                .set_verification_status(account_id, ApprovalStatus::Pending)
                .await?;
        }

        self.cache.invalidate(account_id);
        self.audit
            .insert_entry(&AccountAuditLogEntry::new(
                account_id,
                "account.unrejected",
                Some("rejected"),
                Some("pending"),
                Some(admin_id),
                None,
            ))
            .await?;
        self.event_bus
            .publish(DeskEvent::LifecycleChanged {
                account_id,
                role: account.role,
                old_status: ApprovalStatus::Rejected,
                new_status: ApprovalStatus::Pending,
                changed_by: admin_id,
                timestamp: Utc::now(),
            })
            .await;

        info!("account {} unrejected by {}", account_id, admin_id);
        Ok(account)
    }

    /// Permanent removal. Ledger rows referencing the account flip to
    /// removed rather than disappearing, so the audit history survives.
    pub async fn delete(&self, account_id: Uuid, admin_id: Uuid) -> Result<(), Error> {
        require_admin(&self.accounts, admin_id).await?;

        let Some(account) = self.accounts.get(account_id).await? else {
            debug!("delete: account {} already gone", account_id);
            return Ok(());
        };

        let removed = self.assignments.remove_all_for_account(account_id).await?;
        if account.role == Role::Agent {
            self.profiles.delete(account_id).await?;
        }
        self.accounts.delete(account_id).await?;

        self.cache.invalidate(account_id);
        self.audit
            .insert_entry(&AccountAuditLogEntry::new(
                account_id,
                "account.deleted",
                Some(&account.status.to_string()),
                None,
                Some(admin_id),
                Some(&format!("assignments_removed={}", removed)),
            ))
            .await?;
        self.event_bus
            .publish(DeskEvent::AccountDeleted {
                account_id,
                role: account.role,
                changed_by: admin_id,
                timestamp: Utc::now(),
            })
            .await;

        info!(
            "account {} deleted by {} ({} assignments removed)",
            account_id, admin_id, removed
        );
        Ok(())
    }

    /// Admin-editable agent performance stats.
    pub async fn update_agent_stats(
        &self,
        account_id: Uuid,
        admin_id: Uuid,
        success_rate: f64,
        total_clients: i32,
        rating: f64,
    ) -> Result<(), Error> {
        require_admin(&self.accounts, admin_id).await?;

        let account = self
            .accounts
            .get(account_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("account {}", account_id)))?;
        if account.role != Role::Agent {
            return Err(Error::Role(format!(
                "account {} is not an agent",
                account_id
            )));
        }

        self.profiles
            .update_stats(account_id, success_rate, total_clients, rating)
            .await?;
        self.audit
            .insert_entry(&AccountAuditLogEntry::new(
                account_id,
                "agent.stats_updated",
                None,
                Some(&format!(
                    "success_rate={} total_clients={} rating={}",
                    success_rate, total_clients, rating
                )),
                Some(admin_id),
                None,
            ))
            .await?;
        Ok(())
    }
}
