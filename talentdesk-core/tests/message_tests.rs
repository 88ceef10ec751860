// tests/message_tests.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use talentdesk_core::{
    eventbus::EventBus,
    models::{conversation_id, Message, MessageKind, MessageStatus, NewMessage},
    services::MessageService,
    test_utils::memory::MemoryMessageRepository,
    traits::repository_traits::MessageRepository,
    Error,
};

struct Harness {
    messages: Arc<dyn MessageRepository + Send + Sync>,
    service: MessageService,
}

fn setup() -> Harness {
    let messages: Arc<dyn MessageRepository + Send + Sync> =
        Arc::new(MemoryMessageRepository::new());
    let event_bus = Arc::new(EventBus::new());
    let service = MessageService::new(messages.clone(), event_bus);
    Harness { messages, service }
}

fn draft(sender: Uuid, recipient: Uuid, body: &str, kind: MessageKind) -> NewMessage {
    NewMessage {
        sender_id: sender,
        sender_name: "Sender".to_string(),
        recipient_id: recipient,
        recipient_name: "Recipient".to_string(),
        subject: Some("Hello".to_string()),
        body: body.to_string(),
        kind,
        is_reply: false,
    }
}

#[test]
fn test_conversation_id_is_symmetric() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    assert_eq!(conversation_id(a, b), conversation_id(b, a));
    assert!(conversation_id(a, b).starts_with("conv_"));
}

#[test]
fn test_conversation_id_distinct_pairs_differ() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();
    assert_ne!(conversation_id(a, b), conversation_id(a, c));
    assert_ne!(conversation_id(a, b), conversation_id(b, c));
}

#[tokio::test]
async fn test_send_always_carries_conversation_id() -> Result<(), Error> {
    let h = setup();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let sent = h.service.send(draft(a, b, "hi", MessageKind::General)).await?;
    assert_eq!(sent.conversation_id, Some(conversation_id(a, b)));
    assert_eq!(sent.status, MessageStatus::Unread);

    let stored = h.messages.get(sent.message_id).await?.unwrap();
    assert_eq!(stored.conversation_id, Some(conversation_id(b, a)));

    Ok(())
}

#[tokio::test]
async fn test_conversation_backfills_legacy_rows() -> Result<(), Error> {
    let h = setup();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    // a row from before conversation keys existed
    let mut legacy = Message::from(draft(a, b, "old", MessageKind::General));
    legacy.conversation_id = None;
    h.messages.insert(&legacy).await?;

    h.service.send(draft(b, a, "new", MessageKind::General)).await?;

    let conversation = h.service.conversation(a, b).await?;
    assert_eq!(conversation.len(), 2);
    let expected = conversation_id(a, b);
    assert!(conversation
        .iter()
        .all(|m| m.conversation_id.as_deref() == Some(expected.as_str())));

    // the repair is persisted, not just in the returned copies
    let stored = h.messages.get(legacy.message_id).await?.unwrap();
    assert_eq!(stored.conversation_id, Some(expected.clone()));
    assert_eq!(h.messages.list_conversation(&expected).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_conversation_orders_oldest_first() -> Result<(), Error> {
    let h = setup();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let base = Utc::now();

    for (offset, body) in [(0, "first"), (60, "second"), (120, "third")] {
        let mut message = Message::from(draft(a, b, body, MessageKind::General));
        message.created_at = base + Duration::seconds(offset);
        h.messages.insert(&message).await?;
    }

    let conversation = h.service.conversation(b, a).await?;
    let bodies: Vec<&str> = conversation.iter().map(|m| m.body.as_str()).collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);

    Ok(())
}

#[tokio::test]
async fn test_inbox_is_newest_first_and_bounded() -> Result<(), Error> {
    let h = setup();
    let recipient = Uuid::new_v4();
    let base = Utc::now();

    for offset in 0..5 {
        let mut message = Message::from(draft(
            Uuid::new_v4(),
            recipient,
            &format!("msg {}", offset),
            MessageKind::General,
        ));
        message.created_at = base + Duration::seconds(offset);
        h.messages.insert(&message).await?;
    }

    let inbox = h.service.inbox(recipient, 3).await?;
    assert_eq!(inbox.len(), 3);
    assert_eq!(inbox[0].body, "msg 4");
    assert_eq!(inbox[2].body, "msg 2");

    Ok(())
}

#[tokio::test]
async fn test_mark_read_and_saved_flag() -> Result<(), Error> {
    let h = setup();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let sent = h.service.send(draft(a, b, "hi", MessageKind::General)).await?;
    h.service.mark_read(sent.message_id).await?;
    assert_eq!(
        h.messages.get(sent.message_id).await?.unwrap().status,
        MessageStatus::Read
    );
    // marking read twice is harmless
    h.service.mark_read(sent.message_id).await?;

    h.service.set_saved(sent.message_id, true).await?;
    assert!(h.messages.get(sent.message_id).await?.unwrap().saved);

    let err = h.service.mark_read(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    Ok(())
}

#[tokio::test]
async fn test_accepting_service_request_sends_notice() -> Result<(), Error> {
    let h = setup();
    let candidate = Uuid::new_v4();
    let agent = Uuid::new_v4();

    let request = h
        .service
        .send(draft(candidate, agent, "please help", MessageKind::ServiceRequest))
        .await?;

    let notice = h
        .service
        .respond_to_service_request(request.message_id, true, "Agent Ana")
        .await?;

    let stored_request = h.messages.get(request.message_id).await?.unwrap();
    assert_eq!(stored_request.status, MessageStatus::Accepted);

    assert_eq!(notice.recipient_id, candidate);
    assert_eq!(notice.sender_id, agent);
    assert!(notice.is_reply);
    assert!(notice.body.contains("accepted"));
    // the notice lands in the same derived thread
    assert_eq!(
        notice.conversation_id,
        Some(conversation_id(candidate, agent))
    );

    // a retried click does not send a second notice
    h.service
        .respond_to_service_request(request.message_id, true, "Agent Ana")
        .await?;
    let thread = h.service.conversation(candidate, agent).await?;
    assert_eq!(thread.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_declining_service_request() -> Result<(), Error> {
    let h = setup();
    let candidate = Uuid::new_v4();
    let agent = Uuid::new_v4();

    let request = h
        .service
        .send(draft(candidate, agent, "please help", MessageKind::ServiceRequest))
        .await?;
    let notice = h
        .service
        .respond_to_service_request(request.message_id, false, "Agent Ana")
        .await?;

    assert_eq!(
        h.messages.get(request.message_id).await?.unwrap().status,
        MessageStatus::Rejected
    );
    assert!(notice.body.contains("declined"));

    Ok(())
}

#[tokio::test]
async fn test_respond_rejects_non_service_requests() -> Result<(), Error> {
    let h = setup();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let plain = h.service.send(draft(a, b, "hi", MessageKind::General)).await?;
    let err = h
        .service
        .respond_to_service_request(plain.message_id, true, "Agent Ana")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));

    Ok(())
}
