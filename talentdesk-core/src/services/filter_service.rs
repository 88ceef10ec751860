use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use talentdesk_common::models::account::Account;
use talentdesk_common::models::filter::FilterSpec;
use talentdesk_common::traits::repository_traits::AppConfigRepository;

use crate::Error;

/// Saved admin list filters, stored per admin as a JSON name->spec map in
/// the app-config table.
pub struct SavedFilterService {
    config: Arc<dyn AppConfigRepository + Send + Sync>,
}

impl SavedFilterService {
    pub fn new(config: Arc<dyn AppConfigRepository + Send + Sync>) -> Self {
        Self { config }
    }

    pub async fn save_filter(
        &self,
        admin_id: Uuid,
        name: &str,
        spec: &FilterSpec,
    ) -> Result<(), Error> {
        let mut filters = self.load_filters(admin_id).await?;
        filters.insert(name.to_string(), spec.clone());
        let json = serde_json::to_string(&filters)?;
        self.config.set_saved_filters(admin_id, &json).await
    }

    pub async fn load_filters(
        &self,
        admin_id: Uuid,
    ) -> Result<BTreeMap<String, FilterSpec>, Error> {
        match self.config.get_saved_filters(admin_id).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(BTreeMap::new()),
        }
    }

    pub async fn delete_filter(&self, admin_id: Uuid, name: &str) -> Result<(), Error> {
        let mut filters = self.load_filters(admin_id).await?;
        if filters.remove(name).is_none() {
            debug!("delete_filter: no filter named '{}' for {}", name, admin_id);
            return Ok(());
        }
        let json = serde_json::to_string(&filters)?;
        self.config.set_saved_filters(admin_id, &json).await
    }

    /// Applies a spec to an already-fetched account list.
    pub fn apply<'a>(accounts: &'a [Account], spec: &FilterSpec) -> Vec<&'a Account> {
        accounts.iter().filter(|a| spec.matches(a)).collect()
    }
}
