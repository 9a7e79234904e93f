//! Persistence gateway boundary.
//!
//! Edit sessions never talk to storage directly. They hand a finished
//! document to a [`PersistenceGateway`], which may be a hosted backend, a
//! local file store or an in-memory map.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{DashError, Result};
use crate::record::Record;

/// Identifies one stored document: a collection (table) plus a row id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub collection: String,
    pub id: String,
}

impl RecordKey {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// An abstract store for admin records.
///
/// Implementations decide how a key maps onto storage; `save` replaces the
/// stored document (insert-or-update).
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Fetches the stored document. `Ok(None)` means it does not exist.
    async fn load(&self, key: &RecordKey) -> Result<Option<Record>>;

    /// Replaces the stored document.
    async fn save(&self, key: &RecordKey, record: &Record) -> Result<()>;

    /// Fetches every document of a collection, in storage order.
    async fn list(&self, collection: &str) -> Result<Vec<Record>>;

    /// Removes a document. Removing a missing document is not an error.
    async fn delete(&self, key: &RecordKey) -> Result<()>;
}

#[derive(Debug, Clone)]
pub enum LoadErrorKind {
    NotFound,
    Gateway(DashError),
}

/// Initial fetch failed; there is no snapshot to show or edit.
#[derive(Debug, Clone)]
pub struct LoadError {
    pub key: RecordKey,
    pub kind: LoadErrorKind,
}

impl LoadError {
    pub fn not_found(key: RecordKey) -> Self {
        Self {
            key,
            kind: LoadErrorKind::NotFound,
        }
    }

    pub fn gateway(key: RecordKey, err: DashError) -> Self {
        Self {
            key,
            kind: LoadErrorKind::Gateway(err),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, LoadErrorKind::NotFound)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LoadErrorKind::NotFound => write!(f, "{} was not found", self.key),
            LoadErrorKind::Gateway(err) => write!(f, "failed to load {}: {}", self.key, err),
        }
    }
}

impl std::error::Error for LoadError {}

/// The gateway rejected a save. The reason is shown, never interpreted.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to save {key}: {reason}")]
pub struct PersistenceError {
    pub key: RecordKey,
    pub reason: String,
}

/// Loads a document and maps absence to [`LoadError`].
pub async fn load_required<G>(gateway: &G, key: &RecordKey) -> std::result::Result<Record, LoadError>
where
    G: PersistenceGateway + ?Sized,
{
    match gateway.load(key).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(LoadError::not_found(key.clone())),
        Err(err) => Err(LoadError::gateway(key.clone(), err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        assert_eq!(RecordKey::new("courses", "c-1").to_string(), "courses/c-1");
    }

    #[test]
    fn test_load_error_messages() {
        let key = RecordKey::new("hero", "home");
        assert_eq!(LoadError::not_found(key.clone()).to_string(), "hero/home was not found");
        let err = LoadError::gateway(key, DashError::data_access("offline"));
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "failed to load hero/home: Data access error: offline"
        );
    }
}
