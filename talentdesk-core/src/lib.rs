// src/lib.rs

pub mod cache;
pub mod db;
pub mod eventbus;
pub mod repositories;
pub mod services;
pub mod test_utils;

pub use db::Database;
pub use talentdesk_common::error::Error;
pub use talentdesk_common::models;
pub use talentdesk_common::traits;
