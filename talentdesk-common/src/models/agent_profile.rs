use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::account::ApprovalStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: String,
    pub end: String,
}

/// Per-agent profile document, denormalized from the account record.
///
/// `verification_status` mirrors the account's approval status; the account
/// column is authoritative and readers must tolerate a stale mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub account_id: Uuid,
    /// Platform offerings the agent services.
    pub services: Vec<String>,
    /// Offering name to price.
    pub prices: HashMap<String, f64>,
    pub percentage_charge: Option<f64>,
    pub one_time_fee: Option<f64>,
    pub working_hours: Option<WorkingHours>,
    pub success_rate: f64,
    pub total_clients: i32,
    pub rating: f64,
    /// Public URL of uploaded verification documents, if any.
    pub credentials_url: Option<String>,
    pub verification_status: ApprovalStatus,
    pub updated_at: DateTime<Utc>,
}

impl AgentProfile {
    pub fn new(account_id: Uuid) -> Self {
        Self {
            account_id,
            services: Vec::new(),
            prices: HashMap::new(),
            percentage_charge: None,
            one_time_fee: None,
            working_hours: None,
            success_rate: 0.0,
            total_clients: 0,
            rating: 0.0,
            credentials_url: None,
            verification_status: ApprovalStatus::Pending,
            updated_at: Utc::now(),
        }
    }
}
