// src/repositories/mod.rs

pub mod postgres;

pub use postgres::account::PostgresAccountRepository;
pub use postgres::account_audit_log::PostgresAccountAuditLogRepository;
pub use postgres::agent_profile::PostgresAgentProfileRepository;
pub use postgres::app_config::PostgresAppConfigRepository;
pub use postgres::assignment::PostgresAssignmentRepository;
pub use postgres::category::PostgresCategoryRepository;
pub use postgres::message::PostgresMessageRepository;
pub use postgres::notification::PostgresNotificationRepository;

pub use talentdesk_common::traits::repository_traits::{
    AccountAuditLogRepository, AccountRepository, AgentProfileRepository, AppConfigRepository,
    AssignmentRepository, CategoryRepository, MessageRepository, NotificationRepository,
};
