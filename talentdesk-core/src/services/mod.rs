// File: src/services/mod.rs

pub mod assignment_service;
pub mod category_service;
pub mod filter_service;
pub mod lifecycle_service;
pub mod message_service;

pub use assignment_service::AssignmentService;
pub use category_service::CategoryService;
pub use filter_service::SavedFilterService;
pub use lifecycle_service::AccountLifecycleService;
pub use message_service::MessageService;

use std::sync::Arc;

use uuid::Uuid;

use talentdesk_common::models::account::Role;
use talentdesk_common::traits::repository_traits::AccountRepository;

use crate::Error;

/// The external store's security rules are the real gate; this check lets
/// callers see PermissionDenied without a live backend.
pub(crate) async fn require_admin(
    accounts: &Arc<dyn AccountRepository + Send + Sync>,
    admin_id: Uuid,
) -> Result<(), Error> {
    let actor = accounts
        .get(admin_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("account {}", admin_id)))?;
    if actor.role != Role::Admin {
        return Err(Error::PermissionDenied(format!(
            "account {} is not an admin",
            admin_id
        )));
    }
    Ok(())
}
