use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Agent,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Candidate => write!(f, "candidate"),
            Role::Agent => write!(f, "agent"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "candidate" => Ok(Role::Candidate),
            "agent" => Ok(Role::Agent),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Canonical account state. Exactly one of the three holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Collapses the approved/rejected flag pair used by the previous
    /// storage scheme into the tri-state. A record carrying both flags
    /// normalizes to `Rejected`.
    pub fn from_flags(approved: bool, rejected: bool) -> Self {
        if rejected {
            ApprovalStatus::Rejected
        } else if approved {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Pending
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalStatus::Pending => write!(f, "pending"),
            ApprovalStatus::Approved => write!(f, "approved"),
            ApprovalStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Unknown approval status: {}", s)),
        }
    }
}

/// Present iff the account status is `Rejected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: Option<String>,
    pub rejected_at: DateTime<Utc>,
    pub rejected_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    /// Fixed at creation, never changes.
    pub role: Role,
    pub status: ApprovalStatus,
    pub rejection: Option<Rejection>,
    pub approved_at: Option<DateTime<Utc>>,
    /// Admin-assigned labels; no duplicates, order-insignificant.
    pub categories: Vec<String>,
    /// Candidates only: which agents this candidate may message.
    pub assigned_agent_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(role: Role, email: &str, display_name: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            account_id: Uuid::new_v4(),
            email: email.to_string(),
            display_name: display_name.map(String::from),
            role,
            status: ApprovalStatus::Pending,
            rejection: None,
            approved_at: None,
            categories: Vec::new(),
            assigned_agent_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_approved(&mut self) {
        let now = Utc::now();
        self.status = ApprovalStatus::Approved;
        self.rejection = None;
        self.approved_at = Some(now);
        self.updated_at = now;
    }

    pub fn mark_rejected(&mut self, reason: Option<&str>, rejected_by: Option<Uuid>) {
        let now = Utc::now();
        self.status = ApprovalStatus::Rejected;
        self.rejection = Some(Rejection {
            reason: reason.map(String::from),
            rejected_at: now,
            rejected_by,
        });
        self.approved_at = None;
        self.updated_at = now;
    }

    /// Back to `Pending`, dropping all rejection metadata.
    pub fn clear_rejection(&mut self) {
        self.status = ApprovalStatus::Pending;
        self.rejection = None;
        self.updated_at = Utc::now();
    }

    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    pub fn has_assigned_agent(&self, agent_id: Uuid) -> bool {
        self.assigned_agent_ids.contains(&agent_id)
    }
}

#[derive(Debug, Clone)]
pub struct AccountAuditLogEntry {
    pub audit_id: Uuid,
    pub account_id: Uuid,
    pub event_type: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Option<String>,
}

impl AccountAuditLogEntry {
    pub fn new(
        account_id: Uuid,
        event_type: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
        changed_by: Option<Uuid>,
        metadata: Option<&str>,
    ) -> Self {
        Self {
            audit_id: Uuid::new_v4(),
            account_id,
            event_type: event_type.to_string(),
            old_value: old_value.map(String::from),
            new_value: new_value.map(String::from),
            changed_by,
            timestamp: Utc::now(),
            metadata: metadata.map(String::from),
        }
    }
}
