use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use talentdesk_common::models::message::{
    conversation_id, Message, MessageKind, MessageStatus, NewMessage,
};
use talentdesk_common::traits::repository_traits::MessageRepository;

use crate::eventbus::{DeskEvent, EventBus};
use crate::Error;

/// Sends and reads messages. Threads are not stored anywhere; they exist
/// only as the derived conversation key over a participant pair.
pub struct MessageService {
    messages: Arc<dyn MessageRepository + Send + Sync>,
    event_bus: Arc<EventBus>,
}

impl MessageService {
    pub fn new(
        messages: Arc<dyn MessageRepository + Send + Sync>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            messages,
            event_bus,
        }
    }

    pub async fn send(&self, draft: NewMessage) -> Result<Message, Error> {
        let message = Message::from(draft);
        debug!(
            "send: {} -> {} ({})",
            message.sender_id, message.recipient_id, message.kind
        );
        self.messages.insert(&message).await?;

        self.event_bus
            .publish(DeskEvent::MessageSent {
                message_id: message.message_id,
                sender_id: message.sender_id,
                sender_name: message.sender_name.clone(),
                recipient_id: message.recipient_id,
                // new writes always carry the key
                conversation_id: message.conversation_id.clone().unwrap_or_default(),
                kind: message.kind,
                timestamp: Utc::now(),
            })
            .await;

        Ok(message)
    }

    /// Both directions of the pair, oldest first. Rows that predate
    /// conversation keys are repaired in place; a failed repair is logged
    /// and skipped, never fails the read.
    pub async fn conversation(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>, Error> {
        let conv_id = conversation_id(a, b);
        let mut messages = self.messages.list_between(a, b).await?;

        for message in &mut messages {
            if message.conversation_id.is_none() {
                if let Err(e) = self
                    .messages
                    .set_conversation_id(message.message_id, &conv_id)
                    .await
                {
                    warn!(
                        "failed to backfill conversation id on {}: {:?}",
                        message.message_id, e
                    );
                    continue;
                }
                message.conversation_id = Some(conv_id.clone());
            }
        }

        Ok(messages)
    }

    pub async fn inbox(&self, recipient_id: Uuid, limit: i64) -> Result<Vec<Message>, Error> {
        self.messages.list_for_recipient(recipient_id, limit).await
    }

    pub async fn mark_read(&self, message_id: Uuid) -> Result<(), Error> {
        let message = self
            .messages
            .get(message_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("message {}", message_id)))?;
        if message.status == MessageStatus::Unread {
            self.messages
                .set_status(message_id, MessageStatus::Read)
                .await?;
        }
        Ok(())
    }

    pub async fn set_saved(&self, message_id: Uuid, saved: bool) -> Result<(), Error> {
        if self.messages.get(message_id).await?.is_none() {
            return Err(Error::NotFound(format!("message {}", message_id)));
        }
        self.messages.set_saved(message_id, saved).await
    }

    /// Accept or decline a service request. Flips the request's status and
    /// sends the system-generated notice back to the requester, keyed into
    /// the same conversation.
    pub async fn respond_to_service_request(
        &self,
        message_id: Uuid,
        accept: bool,
        responder_name: &str,
    ) -> Result<Message, Error> {
        let request = self
            .messages
            .get(message_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("message {}", message_id)))?;

        if request.kind != MessageKind::ServiceRequest {
            return Err(Error::Parse(format!(
                "message {} is not a service request",
                message_id
            )));
        }

        let new_status = if accept {
            MessageStatus::Accepted
        } else {
            MessageStatus::Rejected
        };
        if request.status == new_status {
            // retried click; the notice already went out
            debug!(
                "respond_to_service_request: message {} already {}",
                message_id, new_status
            );
            return Ok(request);
        }

        self.messages.set_status(message_id, new_status).await?;

        let body = if accept {
            format!("{} accepted your service request", responder_name)
        } else {
            format!("{} declined your service request", responder_name)
        };
        let notice = NewMessage {
            sender_id: request.recipient_id,
            sender_name: responder_name.to_string(),
            recipient_id: request.sender_id,
            recipient_name: request.sender_name.clone(),
            subject: request.subject.clone(),
            body,
            kind: MessageKind::General,
            is_reply: true,
        };
        let sent = self.send(notice).await?;

        info!(
            "service request {} {} by {}",
            message_id,
            if accept { "accepted" } else { "declined" },
            responder_name
        );
        Ok(sent)
    }
}
