use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row in an account's notification feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: Uuid,
    pub account_id: Uuid,
    pub event_type: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(account_id: Uuid, event_type: &str, body: &str) -> Self {
        Self {
            notification_id: Uuid::new_v4(),
            account_id,
            event_type: event_type.to_string(),
            body: body.to_string(),
            read: false,
            created_at: Utc::now(),
        }
    }
}
