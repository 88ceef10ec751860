// File: talentdesk-core/src/test_utils/memory.rs
//
// In-memory implementations of the repository traits. Service tests run
// against these without a live Postgres; update/delete of a missing row is
// a no-op, matching the SQL implementations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use talentdesk_common::models::account::{
    Account, AccountAuditLogEntry, ApprovalStatus, Role,
};
use talentdesk_common::models::agent_profile::AgentProfile;
use talentdesk_common::models::assignment::{Assignment, AssignmentStatus};
use talentdesk_common::models::category::{Category, CategoryScope};
use talentdesk_common::models::message::{Message, MessageStatus};
use talentdesk_common::models::notification::Notification;
use talentdesk_common::traits::repository_traits::{
    AccountAuditLogRepository, AccountRepository, AgentProfileRepository, AppConfigRepository,
    AssignmentRepository, CategoryRepository, MessageRepository, NotificationRepository,
};

use crate::Error;

#[derive(Default, Clone)]
pub struct MemoryAccountRepository {
    accounts: Arc<Mutex<HashMap<Uuid, Account>>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn create(&self, account: &Account) -> Result<(), Error> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&account.account_id) {
            return Err(Error::Parse(format!(
                "duplicate account id {}",
                account.account_id
            )));
        }
        accounts.insert(account.account_id, account.clone());
        Ok(())
    }

    async fn get(&self, account_id: Uuid) -> Result<Option<Account>, Error> {
        Ok(self.accounts.lock().unwrap().get(&account_id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn update(&self, account: &Account) -> Result<(), Error> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(existing) = accounts.get_mut(&account.account_id) {
            // role stays as created, like the SQL UPDATE
            let role = existing.role;
            *existing = account.clone();
            existing.role = role;
        }
        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<(), Error> {
        self.accounts.lock().unwrap().remove(&account_id);
        Ok(())
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Account>, Error> {
        let mut results: Vec<Account> = self
            .accounts
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.role == role)
            .cloned()
            .collect();
        results.sort_by_key(|a| a.created_at);
        Ok(results)
    }

    async fn list_by_role_and_status(
        &self,
        role: Role,
        status: ApprovalStatus,
    ) -> Result<Vec<Account>, Error> {
        let mut results: Vec<Account> = self
            .accounts
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.role == role && a.status == status)
            .cloned()
            .collect();
        results.sort_by_key(|a| a.created_at);
        Ok(results)
    }

    async fn set_categories(&self, account_id: Uuid, categories: &[String]) -> Result<(), Error> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.get_mut(&account_id) {
            account.categories = categories.to_vec();
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn add_assigned_agent(&self, candidate_id: Uuid, agent_id: Uuid) -> Result<(), Error> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.get_mut(&candidate_id) {
            if !account.assigned_agent_ids.contains(&agent_id) {
                account.assigned_agent_ids.push(agent_id);
                account.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn remove_assigned_agent(
        &self,
        candidate_id: Uuid,
        agent_id: Uuid,
    ) -> Result<(), Error> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.get_mut(&candidate_id) {
            account.assigned_agent_ids.retain(|id| *id != agent_id);
            account.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryAgentProfileRepository {
    profiles: Arc<Mutex<HashMap<Uuid, AgentProfile>>>,
}

impl MemoryAgentProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentProfileRepository for MemoryAgentProfileRepository {
    async fn upsert(&self, profile: &AgentProfile) -> Result<(), Error> {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.account_id, profile.clone());
        Ok(())
    }

    async fn get(&self, account_id: Uuid) -> Result<Option<AgentProfile>, Error> {
        Ok(self.profiles.lock().unwrap().get(&account_id).cloned())
    }

    async fn set_verification_status(
        &self,
        account_id: Uuid,
        status: ApprovalStatus,
    ) -> Result<(), Error> {
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(profile) = profiles.get_mut(&account_id) {
            profile.verification_status = status;
            profile.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_stats(
        &self,
        account_id: Uuid,
        success_rate: f64,
        total_clients: i32,
        rating: f64,
    ) -> Result<(), Error> {
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(profile) = profiles.get_mut(&account_id) {
            profile.success_rate = success_rate;
            profile.total_clients = total_clients;
            profile.rating = rating;
            profile.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, account_id: Uuid) -> Result<(), Error> {
        self.profiles.lock().unwrap().remove(&account_id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryAssignmentRepository {
    assignments: Arc<Mutex<HashMap<Uuid, Assignment>>>,
}

impl MemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentRepository for MemoryAssignmentRepository {
    async fn create(&self, assignment: &Assignment) -> Result<(), Error> {
        let mut assignments = self.assignments.lock().unwrap();
        let duplicate = assignments.values().any(|a| {
            a.candidate_id == assignment.candidate_id && a.agent_id == assignment.agent_id
        });
        if duplicate {
            return Err(Error::Parse(format!(
                "duplicate assignment pair ({}, {})",
                assignment.candidate_id, assignment.agent_id
            )));
        }
        assignments.insert(assignment.assignment_id, assignment.clone());
        Ok(())
    }

    async fn get(&self, assignment_id: Uuid) -> Result<Option<Assignment>, Error> {
        Ok(self.assignments.lock().unwrap().get(&assignment_id).cloned())
    }

    async fn get_by_pair(
        &self,
        candidate_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Option<Assignment>, Error> {
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .values()
            .find(|a| a.candidate_id == candidate_id && a.agent_id == agent_id)
            .cloned())
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), Error> {
        let mut assignments = self.assignments.lock().unwrap();
        if assignments.contains_key(&assignment.assignment_id) {
            assignments.insert(assignment.assignment_id, assignment.clone());
        }
        Ok(())
    }

    async fn set_status(
        &self,
        assignment_id: Uuid,
        status: AssignmentStatus,
    ) -> Result<(), Error> {
        let mut assignments = self.assignments.lock().unwrap();
        if let Some(assignment) = assignments.get_mut(&assignment_id) {
            assignment.status = status;
            assignment.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<Assignment>, Error> {
        let mut results: Vec<Assignment> = self
            .assignments
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect();
        results.sort_by_key(|a| a.assigned_at);
        Ok(results)
    }

    async fn list_for_agent(&self, agent_id: Uuid) -> Result<Vec<Assignment>, Error> {
        let mut results: Vec<Assignment> = self
            .assignments
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.agent_id == agent_id)
            .cloned()
            .collect();
        results.sort_by_key(|a| a.assigned_at);
        Ok(results)
    }

    async fn remove_all_for_account(&self, account_id: Uuid) -> Result<u64, Error> {
        let mut assignments = self.assignments.lock().unwrap();
        let mut removed = 0u64;
        for assignment in assignments.values_mut() {
            let references = assignment.candidate_id == account_id
                || assignment.agent_id == account_id;
            if references && assignment.status == AssignmentStatus::Active {
                assignment.status = AssignmentStatus::Removed;
                assignment.updated_at = Utc::now();
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[derive(Default, Clone)]
pub struct MemoryMessageRepository {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for MemoryMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), Error> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn get(&self, message_id: Uuid) -> Result<Option<Message>, Error> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.message_id == message_id)
            .cloned())
    }

    async fn set_status(&self, message_id: Uuid, status: MessageStatus) -> Result<(), Error> {
        let mut messages = self.messages.lock().unwrap();
        if let Some(message) = messages.iter_mut().find(|m| m.message_id == message_id) {
            message.status = status;
        }
        Ok(())
    }

    async fn set_saved(&self, message_id: Uuid, saved: bool) -> Result<(), Error> {
        let mut messages = self.messages.lock().unwrap();
        if let Some(message) = messages.iter_mut().find(|m| m.message_id == message_id) {
            message.saved = saved;
        }
        Ok(())
    }

    async fn set_conversation_id(
        &self,
        message_id: Uuid,
        conversation_id: &str,
    ) -> Result<(), Error> {
        let mut messages = self.messages.lock().unwrap();
        if let Some(message) = messages.iter_mut().find(|m| m.message_id == message_id) {
            message.conversation_id = Some(conversation_id.to_string());
        }
        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>, Error> {
        let mut results: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.recipient_id == recipient_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        results.truncate(limit as usize);
        Ok(results)
    }

    async fn list_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, Error> {
        let mut results: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.recipient_id == b)
                    || (m.sender_id == b && m.recipient_id == a)
            })
            .cloned()
            .collect();
        results.sort_by_key(|m| m.created_at);
        Ok(results)
    }

    async fn list_conversation(&self, conversation_id: &str) -> Result<Vec<Message>, Error> {
        let mut results: Vec<Message> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.conversation_id.as_deref() == Some(conversation_id))
            .cloned()
            .collect();
        results.sort_by_key(|m| m.created_at);
        Ok(results)
    }
}

#[derive(Default, Clone)]
pub struct MemoryCategoryRepository {
    categories: Arc<Mutex<Vec<Category>>>,
}

impl MemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn add(&self, scope: CategoryScope, name: &str) -> Result<(), Error> {
        let mut categories = self.categories.lock().unwrap();
        if categories.iter().any(|c| c.scope == scope && c.name == name) {
            return Err(Error::Parse(format!(
                "duplicate category ({}, {})",
                scope, name
            )));
        }
        categories.push(Category::new(scope, name));
        Ok(())
    }

    async fn exists(&self, scope: CategoryScope, name: &str) -> Result<bool, Error> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.scope == scope && c.name == name))
    }

    async fn remove(&self, scope: CategoryScope, name: &str) -> Result<(), Error> {
        self.categories
            .lock()
            .unwrap()
            .retain(|c| !(c.scope == scope && c.name == name));
        Ok(())
    }

    async fn list(&self, scope: CategoryScope) -> Result<Vec<Category>, Error> {
        let mut results: Vec<Category> = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.scope == scope)
            .cloned()
            .collect();
        results.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(results)
    }
}

#[derive(Default, Clone)]
pub struct MemoryNotificationRepository {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), Error> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn insert_batch(&self, notifications: &[Notification]) -> Result<(), Error> {
        self.notifications
            .lock()
            .unwrap()
            .extend_from_slice(notifications);
        Ok(())
    }

    async fn list_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Notification>, Error> {
        let mut results: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.account_id == account_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        results.truncate(limit as usize);
        Ok(results)
    }

    async fn mark_read(&self, notification_id: Uuid) -> Result<(), Error> {
        let mut notifications = self.notifications.lock().unwrap();
        if let Some(n) = notifications
            .iter_mut()
            .find(|n| n.notification_id == notification_id)
        {
            n.read = true;
        }
        Ok(())
    }

    async fn unread_count(&self, account_id: Uuid) -> Result<i64, Error> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.account_id == account_id && !n.read)
            .count() as i64)
    }
}

#[derive(Default, Clone)]
pub struct MemoryAccountAuditLogRepository {
    entries: Arc<Mutex<Vec<AccountAuditLogEntry>>>,
}

impl MemoryAccountAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountAuditLogRepository for MemoryAccountAuditLogRepository {
    async fn insert_entry(&self, entry: &AccountAuditLogEntry) -> Result<(), Error> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn get_entry(&self, audit_id: Uuid) -> Result<Option<AccountAuditLogEntry>, Error> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.audit_id == audit_id)
            .cloned())
    }

    async fn entries_for_account(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AccountAuditLogEntry>, Error> {
        let mut results: Vec<AccountAuditLogEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        results.truncate(limit as usize);
        Ok(results)
    }
}

#[derive(Default, Clone)]
pub struct MemoryAppConfigRepository {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryAppConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppConfigRepository for MemoryAppConfigRepository {
    async fn set_value(&self, config_key: &str, config_value: &str) -> Result<(), Error> {
        self.values
            .lock()
            .unwrap()
            .insert(config_key.to_string(), config_value.to_string());
        Ok(())
    }

    async fn get_value(&self, config_key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.lock().unwrap().get(config_key).cloned())
    }

    async fn delete_value(&self, config_key: &str) -> Result<(), Error> {
        self.values.lock().unwrap().remove(config_key);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>, Error> {
        let mut results: Vec<(String, String)> = self
            .values
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        results.sort();
        Ok(results)
    }
}
