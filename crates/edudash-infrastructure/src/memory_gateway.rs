//! In-memory persistence gateway.
//!
//! Used for demos and tests. Saves can be made to fail on demand so callers
//! can exercise the failed-save path without a real backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use edudash_core::error::Result;
use edudash_core::{DashError, PersistenceGateway, Record, RecordKey};

#[derive(Debug, Default)]
struct MemoryState {
    collections: BTreeMap<String, BTreeMap<String, Record>>,
    fail_saves: Option<String>,
    save_count: usize,
}

/// Gateway holding every collection in a shared map. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document directly, bypassing failure injection.
    pub async fn seed(&self, key: RecordKey, record: Record) {
        let mut state = self.state.write().await;
        state
            .collections
            .entry(key.collection)
            .or_default()
            .insert(key.id, record);
    }

    /// Makes every subsequent save fail with `reason`.
    pub async fn fail_saves_with(&self, reason: impl Into<String>) {
        self.state.write().await.fail_saves = Some(reason.into());
    }

    pub async fn clear_failure(&self) {
        self.state.write().await.fail_saves = None;
    }

    /// Number of save attempts received, failed ones included.
    pub async fn save_count(&self) -> usize {
        self.state.read().await.save_count
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn load(&self, key: &RecordKey) -> Result<Option<Record>> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(&key.collection)
            .and_then(|c| c.get(&key.id))
            .cloned())
    }

    async fn save(&self, key: &RecordKey, record: &Record) -> Result<()> {
        let mut state = self.state.write().await;
        state.save_count += 1;
        if let Some(reason) = &state.fail_saves {
            return Err(DashError::data_access(reason.clone()));
        }
        state
            .collections
            .entry(key.collection.clone())
            .or_default()
            .insert(key.id.clone(), record.clone());
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Record>> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, key: &RecordKey) -> Result<()> {
        let mut state = self.state.write().await;
        if let Some(c) = state.collections.get_mut(&key.collection) {
            c.remove(&key.id);
        }
        Ok(())
    }
}
