use serde::{Deserialize, Serialize};

use crate::models::account::{Account, ApprovalStatus};

/// A saved admin list filter. Empty fields match everything; categories use
/// any-of semantics (a single shared label is a match).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub statuses: Vec<ApprovalStatus>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl FilterSpec {
    pub fn matches(&self, account: &Account) -> bool {
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&account.status);
        let category_ok = self.categories.is_empty()
            || account
                .categories
                .iter()
                .any(|c| self.categories.contains(c));
        status_ok && category_ok
    }
}
