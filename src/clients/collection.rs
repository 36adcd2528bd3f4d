//! Client collection — the persisted list of committed clients.
//!
//! The whole list is stored as one JSON array under [`CLIENTS_KEY`]. Reads
//! return the full list; writes replace it (last writer wins).

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::KeyValueStore;

use super::model::{ClientRecord, Tier};

/// Store key for the client collection.
pub const CLIENTS_KEY: &str = "clients";

/// Repository over the persisted client list.
#[derive(Clone)]
pub struct ClientCollection {
    store: Arc<dyn KeyValueStore>,
}

impl ClientCollection {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the full client list. A missing entry is an empty list.
    pub async fn load(&self) -> Result<Vec<ClientRecord>, StoreError> {
        match self.store.get(CLIENTS_KEY).await? {
            Some(value) => {
                let clients: Vec<ClientRecord> = serde_json::from_value(value)
                    .map_err(|e| StoreError::Serialization(format!("{CLIENTS_KEY}: {e}")))?;
                debug!(count = clients.len(), "Loaded client collection");
                Ok(clients)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the stored list with `clients`.
    pub async fn save(&self, clients: &[ClientRecord]) -> Result<(), StoreError> {
        let value = serde_json::to_value(clients)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(CLIENTS_KEY, &value).await?;
        info!(count = clients.len(), "Saved client collection");
        Ok(())
    }

    /// Look up a client by id.
    pub async fn find(&self, id: &str) -> Result<Option<ClientRecord>, StoreError> {
        Ok(self.load().await?.into_iter().find(|c| c.id == id))
    }
}

/// Filter applied when listing clients.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub tier: Option<Tier>,
    /// Case-insensitive substring of the client name.
    pub search: Option<String>,
}

impl ClientFilter {
    pub fn matches(&self, client: &ClientRecord) -> bool {
        if self.tier.is_some_and(|t| t != client.tier) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => client
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }

    /// Matching clients, in stored order.
    pub fn apply<'a>(&self, clients: &'a [ClientRecord]) -> Vec<&'a ClientRecord> {
        clients.iter().filter(|c| self.matches(c)).collect()
    }
}
