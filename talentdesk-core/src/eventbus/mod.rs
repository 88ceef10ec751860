//! src/eventbus/mod.rs
//!
//! In-process event bus with guaranteed delivery to multiple subscribers
//! via bounded MPSC queues. The notification feed and any live dashboard
//! view subscribe here.

pub mod notification_writer;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch, Mutex};
use uuid::Uuid;

use talentdesk_common::models::account::{ApprovalStatus, Role};
use talentdesk_common::models::message::MessageKind;

/// Everything the desk publishes. Subscribers filter for what they care
/// about.
#[derive(Debug, Clone)]
pub enum DeskEvent {
    /// An account moved between pending/approved/rejected.
    LifecycleChanged {
        account_id: Uuid,
        role: Role,
        old_status: ApprovalStatus,
        new_status: ApprovalStatus,
        changed_by: Uuid,
        timestamp: DateTime<Utc>,
    },

    AccountDeleted {
        account_id: Uuid,
        role: Role,
        changed_by: Uuid,
        timestamp: DateTime<Utc>,
    },

    AgentAssigned {
        candidate_id: Uuid,
        agent_id: Uuid,
        assigned_by: Uuid,
        timestamp: DateTime<Utc>,
    },

    AgentUnassigned {
        candidate_id: Uuid,
        agent_id: Uuid,
        changed_by: Uuid,
        timestamp: DateTime<Utc>,
    },

    MessageSent {
        message_id: Uuid,
        sender_id: Uuid,
        sender_name: String,
        recipient_id: Uuid,
        conversation_id: String,
        kind: MessageKind,
        timestamp: DateTime<Utc>,
    },

    /// System-wide event for debugging or administration.
    SystemMessage(String),

    /// Periodic heartbeat.
    Tick,
}

impl DeskEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> String {
        match self {
            DeskEvent::LifecycleChanged { new_status, .. } => match new_status {
                ApprovalStatus::Approved => "account.approved".to_string(),
                ApprovalStatus::Rejected => "account.rejected".to_string(),
                ApprovalStatus::Pending => "account.unrejected".to_string(),
            },
            DeskEvent::AccountDeleted { .. } => "account.deleted".to_string(),
            DeskEvent::AgentAssigned { .. } => "agent.assigned".to_string(),
            DeskEvent::AgentUnassigned { .. } => "agent.unassigned".to_string(),
            DeskEvent::MessageSent { .. } => "message.sent".to_string(),
            DeskEvent::SystemMessage(_) => "system_message".to_string(),
            DeskEvent::Tick => "tick".to_string(),
        }
    }

    /// The account whose feed should hear about this event, if any.
    pub fn notify_account(&self) -> Option<Uuid> {
        match self {
            DeskEvent::LifecycleChanged { account_id, .. } => Some(*account_id),
            DeskEvent::AgentAssigned { candidate_id, .. } => Some(*candidate_id),
            DeskEvent::AgentUnassigned { candidate_id, .. } => Some(*candidate_id),
            DeskEvent::MessageSent { recipient_id, .. } => Some(*recipient_id),
            _ => None,
        }
    }
}

/// Each subscriber gets its own `mpsc::Sender<DeskEvent>` for guaranteed
/// delivery.
///
/// - If the subscriber's channel buffer fills, `publish` will await until
///   there's space (backpressure).
/// - If the subscriber has dropped the `Receiver`, the channel is closed
///   and sending returns an error.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<mpsc::Sender<DeskEvent>>>>,
    shutdown_tx: watch::Sender<bool>,
    pub shutdown_rx: watch::Receiver<bool>,
}

/// Default size for each subscriber's buffer.
const DEFAULT_BUFFER_SIZE: usize = 10000;

impl EventBus {
    /// Create a new, empty event bus.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            subscribers: Arc::new(Mutex::new(vec![])),
            shutdown_tx: tx,
            shutdown_rx: rx,
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Returns a receiver on which events will be delivered.
    pub async fn subscribe(&self, buffer_size: Option<usize>) -> mpsc::Receiver<DeskEvent> {
        let size = buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
        let (tx, rx) = mpsc::channel(size);
        let mut subs = self.subscribers.lock().await;
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers.
    pub async fn publish(&self, event: DeskEvent) {
        let senders = {
            let subs = self.subscribers.lock().await;
            subs.clone()
        };
        for s in senders {
            let _ = s.send(event.clone()).await;
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
