//! src/eventbus/notification_writer.rs
//!
//! Spawns a task that subscribes to the EventBus, converts events into
//! notification-feed rows, and flushes them to the DB in batches. Drains
//! the queue on shutdown, then does a final flush.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{error, info};

use talentdesk_common::models::notification::Notification;
use talentdesk_common::traits::repository_traits::NotificationRepository;

use crate::eventbus::{DeskEvent, EventBus};
use crate::Error;

/// Spawns an asynchronous task to receive events from the bus and
/// batch-write notification rows. Returns a `JoinHandle<()>` so the caller
/// can `.await` the final flush in tests or shutdown logic.
pub fn spawn_notification_writer<T>(
    event_bus: &EventBus,
    notification_repo: T,
    buffer_size: usize,
    flush_interval_sec: u64,
) -> JoinHandle<()>
where
    T: NotificationRepository + 'static,
{
    let mut rx = futures_lite::future::block_on(event_bus.subscribe(Some(buffer_size)));
    let mut shutdown_rx = event_bus.shutdown_rx.clone();

    let handle = tokio::spawn(async move {
        let mut buffer = Vec::with_capacity(buffer_size);
        let flush_interval = Duration::from_secs(flush_interval_sec);
        let mut last_flush = Instant::now();

        info!(
            "Notification writer started with batch_size={} flush_interval={}s",
            buffer_size, flush_interval_sec
        );

        loop {
            tokio::select! {
                biased;
                maybe_event = rx.recv() => {
                    match maybe_event {
                        Some(event) => {
                            if let Some(n) = convert_to_notification(&event) {
                                buffer.push(n);
                            }
                            if buffer.len() >= buffer_size {
                                if let Err(e) = insert_batch(&notification_repo, &mut buffer).await {
                                    error!("Error inserting notification batch: {:?}", e);
                                }
                                last_flush = Instant::now();
                            }
                        },
                        None => {
                            info!("Notification writer channel closed => break from loop.");
                            break;
                        }
                    }
                },
                Ok(_) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Notification writer shutting down => break from loop.");
                        break;
                    }
                },
                _ = sleep(flush_interval) => {
                    if !buffer.is_empty() && last_flush.elapsed() >= flush_interval {
                        if let Err(e) = insert_batch(&notification_repo, &mut buffer).await {
                            error!("Periodic notification flush error: {:?}", e);
                        }
                        last_flush = Instant::now();
                    }
                }
            }
        }

        info!("Notification writer: draining any remaining events after loop exit.");
        while let Ok(event) = rx.try_recv() {
            if let Some(n) = convert_to_notification(&event) {
                buffer.push(n);
            }
        }

        if !buffer.is_empty() {
            info!(
                "Notification writer final flush: {} rows remain.",
                buffer.len()
            );
            if let Err(e) = insert_batch(&notification_repo, &mut buffer).await {
                error!("Final notification flush error: {:?}", e);
            }
        }

        info!("Notification writer task exited completely.");
    });
    handle
}

fn convert_to_notification(event: &DeskEvent) -> Option<Notification> {
    let account_id = event.notify_account()?;
    let body = match event {
        DeskEvent::LifecycleChanged { new_status, .. } => {
            format!("Your account is now {}", new_status)
        }
        DeskEvent::AgentAssigned { .. } => "An agent has been assigned to you".to_string(),
        DeskEvent::AgentUnassigned { .. } => {
            "An agent has been removed from your account".to_string()
        }
        DeskEvent::MessageSent { sender_name, .. } => {
            format!("New message from {}", sender_name)
        }
        _ => return None,
    };
    Some(Notification::new(account_id, &event.event_type(), &body))
}

async fn insert_batch<T: NotificationRepository>(
    repo: &T,
    buffer: &mut Vec<Notification>,
) -> Result<(), Error> {
    if buffer.is_empty() {
        return Ok(());
    }
    repo.insert_batch(buffer).await?;
    buffer.clear();
    Ok(())
}
