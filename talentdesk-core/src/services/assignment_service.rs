use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use talentdesk_common::models::account::{Account, AccountAuditLogEntry, ApprovalStatus, Role};
use talentdesk_common::models::assignment::{Assignment, AssignmentStatus};
use talentdesk_common::traits::repository_traits::{
    AccountAuditLogRepository, AccountRepository, AssignmentRepository,
};

use crate::cache::AccountCache;
use crate::eventbus::{DeskEvent, EventBus};
use crate::services::require_admin;
use crate::Error;

/// Maintains the candidate/agent links: the ledger row per pair plus the
/// candidate-side agent list that gates messaging.
pub struct AssignmentService {
    accounts: Arc<dyn AccountRepository + Send + Sync>,
    assignments: Arc<dyn AssignmentRepository + Send + Sync>,
    audit: Arc<dyn AccountAuditLogRepository + Send + Sync>,
    event_bus: Arc<EventBus>,
    cache: Arc<AccountCache>,
}

impl AssignmentService {
    pub fn new(
        accounts: Arc<dyn AccountRepository + Send + Sync>,
        assignments: Arc<dyn AssignmentRepository + Send + Sync>,
        audit: Arc<dyn AccountAuditLogRepository + Send + Sync>,
        event_bus: Arc<EventBus>,
        cache: Arc<AccountCache>,
    ) -> Self {
        Self {
            accounts,
            assignments,
            audit,
            event_bus,
            cache,
        }
    }

    pub async fn assign(
        &self,
        candidate_id: Uuid,
        agent_id: Uuid,
        admin_id: Uuid,
    ) -> Result<Assignment, Error> {
        require_admin(&self.accounts, admin_id).await?;

        let candidate = self
            .accounts
            .get(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("account {}", candidate_id)))?;
        if candidate.role != Role::Candidate {
            return Err(Error::Role(format!(
                "account {} is not a candidate",
                candidate_id
            )));
        }

        let agent = self
            .accounts
            .get(agent_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("account {}", agent_id)))?;
        if agent.role != Role::Agent {
            return Err(Error::Role(format!("account {} is not an agent", agent_id)));
        }

        let assignment = match self.assignments.get_by_pair(candidate_id, agent_id).await? {
            Some(existing) if existing.status == AssignmentStatus::Active => {
                return Err(Error::AlreadyAssigned(format!(
                    "agent {} is already assigned to candidate {}",
                    agent_id, candidate_id
                )));
            }
            Some(mut existing) => {
                // the pair key is unique, so a removed link is revived in
                // place rather than duplicated
                existing.status = AssignmentStatus::Active;
                existing.assigned_by = admin_id;
                existing.assigned_at = Utc::now();
                existing.updated_at = existing.assigned_at;
                self.assignments.update(&existing).await?;
                existing
            }
            None => {
                let created = Assignment::new(candidate_id, agent_id, admin_id);
                self.assignments.create(&created).await?;
                created
            }
        };

        // Ledger first, then the list; if this append fails the caller
        // retries the whole operation and lands in the reactivate arm.
        self.accounts
            .add_assigned_agent(candidate_id, agent_id)
            .await?;

        self.cache.invalidate(candidate_id);
        self.audit
            .insert_entry(&AccountAuditLogEntry::new(
                candidate_id,
                "agent.assigned",
                None,
                Some(&agent_id.to_string()),
                Some(admin_id),
                None,
            ))
            .await?;
        self.event_bus
            .publish(DeskEvent::AgentAssigned {
                candidate_id,
                agent_id,
                assigned_by: admin_id,
                timestamp: Utc::now(),
            })
            .await;

        info!(
            "agent {} assigned to candidate {} by {}",
            agent_id, candidate_id, admin_id
        );
        Ok(assignment)
    }

    pub async fn unassign(
        &self,
        candidate_id: Uuid,
        agent_id: Uuid,
        admin_id: Uuid,
    ) -> Result<(), Error> {
        require_admin(&self.accounts, admin_id).await?;

        let mut ledger_changed = false;
        if let Some(existing) = self.assignments.get_by_pair(candidate_id, agent_id).await? {
            if existing.status == AssignmentStatus::Active {
                self.assignments
                    .set_status(existing.assignment_id, AssignmentStatus::Removed)
                    .await?;
                ledger_changed = true;
            }
        }

        // Always scrub the list; a dangling entry on either side means
        // "not assigned" and this is the repair path.
        self.accounts
            .remove_assigned_agent(candidate_id, agent_id)
            .await?;
        self.cache.invalidate(candidate_id);

        if ledger_changed {
            self.audit
                .insert_entry(&AccountAuditLogEntry::new(
                    candidate_id,
                    "agent.unassigned",
                    Some(&agent_id.to_string()),
                    None,
                    Some(admin_id),
                    None,
                ))
                .await?;
            self.event_bus
                .publish(DeskEvent::AgentUnassigned {
                    candidate_id,
                    agent_id,
                    changed_by: admin_id,
                    timestamp: Utc::now(),
                })
                .await;
            info!(
                "agent {} unassigned from candidate {} by {}",
                agent_id, candidate_id, admin_id
            );
        } else {
            debug!(
                "unassign: pair ({}, {}) was not active; list scrubbed only",
                candidate_id, agent_id
            );
        }
        Ok(())
    }

    /// The candidate's agents, filtered to accounts that still exist and
    /// are approved. A rejected or deleted agent never appears, even when
    /// a stale list entry or orphaned ledger row still references it.
    pub async fn list_agents_for(&self, candidate_id: Uuid) -> Result<Vec<Account>, Error> {
        let candidate = self
            .cache
            .get(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("account {}", candidate_id)))?;

        let mut agents = Vec::new();
        for agent_id in &candidate.assigned_agent_ids {
            let Some(agent) = self.cache.get(*agent_id).await? else {
                debug!("list_agents_for: agent {} no longer exists", agent_id);
                continue;
            };
            if agent.role == Role::Agent && agent.status == ApprovalStatus::Approved {
                agents.push(agent);
            }
        }
        Ok(agents)
    }

    pub async fn assignments_for_candidate(
        &self,
        candidate_id: Uuid,
    ) -> Result<Vec<Assignment>, Error> {
        self.assignments.list_for_candidate(candidate_id).await
    }

    pub async fn assignments_for_agent(&self, agent_id: Uuid) -> Result<Vec<Assignment>, Error> {
        self.assignments.list_for_agent(agent_id).await
    }
}
