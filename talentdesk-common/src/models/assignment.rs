use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Removed,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentStatus::Active => write!(f, "active"),
            AssignmentStatus::Removed => write!(f, "removed"),
        }
    }
}

impl FromStr for AssignmentStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AssignmentStatus::Active),
            "removed" => Ok(AssignmentStatus::Removed),
            _ => Err(format!("Unknown assignment status: {}", s)),
        }
    }
}

/// Audit record for one candidate/agent link. The pair is unique; the
/// candidate's `assigned_agent_ids` list is what gates messaging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: Uuid,
    pub candidate_id: Uuid,
    pub agent_id: Uuid,
    pub assigned_by: Uuid,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(candidate_id: Uuid, agent_id: Uuid, assigned_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            assignment_id: Uuid::new_v4(),
            candidate_id,
            agent_id,
            assigned_by,
            status: AssignmentStatus::Active,
            assigned_at: now,
            updated_at: now,
        }
    }
}
