//! The storage contract. Any backend that can provide documents keyed by
//! id, partial-field updates, and equality queries can implement these.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::models::account::{Account, AccountAuditLogEntry, ApprovalStatus, Role};
use crate::models::agent_profile::AgentProfile;
use crate::models::assignment::{Assignment, AssignmentStatus};
use crate::models::category::{Category, CategoryScope};
use crate::models::message::{Message, MessageStatus};
use crate::models::notification::Notification;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: &Account) -> Result<(), Error>;
    async fn get(&self, account_id: Uuid) -> Result<Option<Account>, Error>;
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, Error>;
    /// Full-record update. The role column is never touched.
    async fn update(&self, account: &Account) -> Result<(), Error>;
    async fn delete(&self, account_id: Uuid) -> Result<(), Error>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, Error>;
    async fn list_by_role_and_status(
        &self,
        role: Role,
        status: ApprovalStatus,
    ) -> Result<Vec<Account>, Error>;
    /// Wholesale replacement of the account's category tags.
    async fn set_categories(&self, account_id: Uuid, categories: &[String]) -> Result<(), Error>;
    /// Appends iff not already present.
    async fn add_assigned_agent(&self, candidate_id: Uuid, agent_id: Uuid) -> Result<(), Error>;
    async fn remove_assigned_agent(&self, candidate_id: Uuid, agent_id: Uuid)
        -> Result<(), Error>;
}

#[async_trait]
pub trait AgentProfileRepository: Send + Sync {
    async fn upsert(&self, profile: &AgentProfile) -> Result<(), Error>;
    async fn get(&self, account_id: Uuid) -> Result<Option<AgentProfile>, Error>;
    /// Refreshes the denormalized approval mirror.
    async fn set_verification_status(
        &self,
        account_id: Uuid,
        status: ApprovalStatus,
    ) -> Result<(), Error>;
    async fn update_stats(
        &self,
        account_id: Uuid,
        success_rate: f64,
        total_clients: i32,
        rating: f64,
    ) -> Result<(), Error>;
    async fn delete(&self, account_id: Uuid) -> Result<(), Error>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: &Assignment) -> Result<(), Error>;
    async fn get(&self, assignment_id: Uuid) -> Result<Option<Assignment>, Error>;
    async fn get_by_pair(
        &self,
        candidate_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Option<Assignment>, Error>;
    async fn update(&self, assignment: &Assignment) -> Result<(), Error>;
    async fn set_status(
        &self,
        assignment_id: Uuid,
        status: AssignmentStatus,
    ) -> Result<(), Error>;
    async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Assignment>, Error>;
    async fn list_for_agent(&self, agent_id: Uuid) -> Result<Vec<Assignment>, Error>;
    /// Marks every active row referencing the account (either side) as
    /// removed. Returns how many rows changed.
    async fn remove_all_for_account(&self, account_id: Uuid) -> Result<u64, Error>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: &Message) -> Result<(), Error>;
    async fn get(&self, message_id: Uuid) -> Result<Option<Message>, Error>;
    async fn set_status(&self, message_id: Uuid, status: MessageStatus) -> Result<(), Error>;
    async fn set_saved(&self, message_id: Uuid, saved: bool) -> Result<(), Error>;
    async fn set_conversation_id(
        &self,
        message_id: Uuid,
        conversation_id: &str,
    ) -> Result<(), Error>;
    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, Error>;
    /// Every message between the pair, in either direction, oldest first.
    async fn list_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, Error>;
    async fn list_conversation(&self, conversation_id: &str) -> Result<Vec<Message>, Error>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn add(&self, scope: CategoryScope, name: &str) -> Result<(), Error>;
    async fn exists(&self, scope: CategoryScope, name: &str) -> Result<bool, Error>;
    async fn remove(&self, scope: CategoryScope, name: &str) -> Result<(), Error>;
    async fn list(&self, scope: CategoryScope) -> Result<Vec<Category>, Error>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<(), Error>;
    async fn insert_batch(&self, notifications: &[Notification]) -> Result<(), Error>;
    async fn list_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, Error>;
    async fn mark_read(&self, notification_id: Uuid) -> Result<(), Error>;
    async fn unread_count(&self, account_id: Uuid) -> Result<i64, Error>;
}

#[async_trait]
pub trait AccountAuditLogRepository: Send + Sync {
    async fn insert_entry(&self, entry: &AccountAuditLogEntry) -> Result<(), Error>;
    async fn get_entry(&self, audit_id: Uuid) -> Result<Option<AccountAuditLogEntry>, Error>;
    async fn entries_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AccountAuditLogEntry>, Error>;
}

#[async_trait]
pub trait AppConfigRepository: Send + Sync {
    async fn set_value(&self, config_key: &str, config_value: &str) -> Result<(), Error>;
    async fn get_value(&self, config_key: &str) -> Result<Option<String>, Error>;
    async fn delete_value(&self, config_key: &str) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<(String, String)>, Error>;

    async fn get_saved_filters(&self, admin_id: Uuid) -> Result<Option<String>, Error> {
        self.get_value(&format!("saved_filters:{}", admin_id)).await
    }
    async fn set_saved_filters(&self, admin_id: Uuid, json_str: &str) -> Result<(), Error> {
        self.set_value(&format!("saved_filters:{}", admin_id), json_str)
            .await
    }
}
