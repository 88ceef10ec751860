use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
    Accepted,
    Rejected,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageStatus::Unread => write!(f, "unread"),
            MessageStatus::Read => write!(f, "read"),
            MessageStatus::Accepted => write!(f, "accepted"),
            MessageStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for MessageStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unread" => Ok(MessageStatus::Unread),
            "read" => Ok(MessageStatus::Read),
            "accepted" => Ok(MessageStatus::Accepted),
            "rejected" => Ok(MessageStatus::Rejected),
            _ => Err(format!("Unknown message status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    General,
    ServiceRequest,
    PaymentConfirmation,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::General => write!(f, "general"),
            MessageKind::ServiceRequest => write!(f, "service_request"),
            MessageKind::PaymentConfirmation => write!(f, "payment_confirmation"),
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(MessageKind::General),
            "service_request" => Ok(MessageKind::ServiceRequest),
            "payment_confirmation" => Ok(MessageKind::PaymentConfirmation),
            _ => Err(format!("Unknown message kind: {}", s)),
        }
    }
}

/// Stable conversation key for a participant pair.
///
/// Lexicographic over the hyphenated string forms, so both orderings of the
/// same pair derive the same key. The `_` separator never appears inside a
/// formatted UUID, which keeps distinct pairs distinct.
pub fn conversation_id(a: Uuid, b: Uuid) -> String {
    let (a, b) = (a.to_string(), b.to_string());
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("conv_{}_{}", lo, hi)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub recipient_id: Uuid,
    pub recipient_name: String,
    pub subject: Option<String>,
    pub body: String,
    pub status: MessageStatus,
    pub kind: MessageKind,
    /// `None` only on rows that predate conversation keys; backfilled when
    /// the conversation is next opened. New writes always carry a key.
    pub conversation_id: Option<String>,
    pub saved: bool,
    pub is_reply: bool,
    pub created_at: DateTime<Utc>,
}

/// What a caller supplies to send a message.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub sender_name: String,
    pub recipient_id: Uuid,
    pub recipient_name: String,
    pub subject: Option<String>,
    pub body: String,
    pub kind: MessageKind,
    pub is_reply: bool,
}

impl From<NewMessage> for Message {
    fn from(draft: NewMessage) -> Self {
        let conversation = conversation_id(draft.sender_id, draft.recipient_id);
        Self {
            message_id: Uuid::new_v4(),
            sender_id: draft.sender_id,
            sender_name: draft.sender_name,
            recipient_id: draft.recipient_id,
            recipient_name: draft.recipient_name,
            subject: draft.subject,
            body: draft.body,
            status: MessageStatus::Unread,
            kind: draft.kind,
            conversation_id: Some(conversation),
            saved: false,
            is_reply: draft.is_reply,
            created_at: Utc::now(),
        }
    }
}
