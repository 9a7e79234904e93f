//! TOML file persistence gateway.
//!
//! Each collection is one document at `{collections_dir}/{collection}.toml`
//! holding every record of that collection keyed by id.
//!
//! ```toml
//! [records.c1]
//! title = { text = "Rust 101" }
//! fee = { number = 900.0 }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use edudash_core::error::Result;
use edudash_core::{DashError, PersistenceGateway, Record, RecordKey};

use crate::paths::DashPaths;
use crate::storage::AtomicTomlFile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CollectionDocument {
    #[serde(default)]
    records: BTreeMap<String, Record>,
}

/// File-backed gateway. All writes go through a locked atomic update.
#[derive(Debug, Clone)]
pub struct TomlFileGateway {
    collections_dir: PathBuf,
}

impl TomlFileGateway {
    /// Creates a gateway rooted at the platform data directory, or at
    /// `data_dir` when given.
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let collections_dir = DashPaths::new(data_dir)
            .collections_dir()
            .map_err(|e| DashError::config(e.to_string()))?;
        Ok(Self::with_base_path(collections_dir))
    }

    /// Creates a gateway over an explicit collections directory (for testing).
    pub fn with_base_path(collections_dir: PathBuf) -> Self {
        Self { collections_dir }
    }

    pub fn collections_dir(&self) -> &Path {
        &self.collections_dir
    }

    fn file_for(&self, collection: &str) -> Result<AtomicTomlFile<CollectionDocument>> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DashError::data_access(format!(
                "Invalid collection name: {:?}",
                collection
            )));
        }
        Ok(AtomicTomlFile::new(
            self.collections_dir.join(format!("{}.toml", collection)),
        ))
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DashError::internal(format!("Storage task failed: {}", e)))?
}

#[async_trait]
impl PersistenceGateway for TomlFileGateway {
    async fn load(&self, key: &RecordKey) -> Result<Option<Record>> {
        let file = self.file_for(&key.collection)?;
        let id = key.id.clone();
        blocking(move || {
            let doc = file.load()?;
            Ok(doc.and_then(|mut d| d.records.remove(&id)))
        })
        .await
    }

    async fn save(&self, key: &RecordKey, record: &Record) -> Result<()> {
        let file = self.file_for(&key.collection)?;
        let id = key.id.clone();
        let record = record.clone();
        blocking(move || {
            file.update(CollectionDocument::default(), |doc| {
                doc.records.insert(id, record);
                Ok(())
            })?;
            Ok(())
        })
        .await?;
        tracing::debug!("[TomlFileGateway] Saved {}", key);
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Record>> {
        let file = self.file_for(collection)?;
        blocking(move || {
            let doc = file.load()?.unwrap_or_default();
            Ok(doc.records.into_values().collect())
        })
        .await
    }

    async fn delete(&self, key: &RecordKey) -> Result<()> {
        let file = self.file_for(&key.collection)?;
        if !file.path().exists() {
            return Ok(());
        }
        let id = key.id.clone();
        let removed = blocking(move || {
            Ok(file.update(CollectionDocument::default(), |doc| {
                Ok(doc.records.remove(&id).is_some())
            })?)
        })
        .await?;
        if removed {
            tracing::debug!("[TomlFileGateway] Deleted {}", key);
        }
        Ok(())
    }
}
