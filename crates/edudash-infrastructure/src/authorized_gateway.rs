//! Capability checks at the gateway boundary.

use async_trait::async_trait;

use edudash_core::access::{Capability, PERMISSIONS_COLLECTION, Principal};
use edudash_core::catalog::Catalog;
use edudash_core::config::OperatorConfig;
use edudash_core::error::Result;
use edudash_core::{DashError, PersistenceGateway, Record, RecordKey};

/// What applies when the operator has no stored permission record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The role from the local config. Used for single-user file storage.
    Config,
    /// The role from the local config, but only while no permission records
    /// exist at all, so the first owner can grant everyone else.
    Bootstrap,
}

/// Wraps a gateway and refuses operations the principal may not perform.
///
/// Reads need [`Capability::Read`] on the collection's section, writes and
/// deletes need [`Capability::Write`]. Collections outside the catalog are
/// always refused.
pub struct AuthorizedGateway<G> {
    inner: G,
    principal: Principal,
    catalog: Catalog,
}

impl<G: PersistenceGateway> AuthorizedGateway<G> {
    pub fn new(inner: G, principal: Principal, catalog: Catalog) -> Self {
        Self {
            inner,
            principal,
            catalog,
        }
    }

    /// Resolves the operator's principal from their stored permission
    /// record, read through the unguarded gateway. The local config only
    /// decides as described by `fallback`.
    pub async fn for_operator(
        inner: G,
        operator: &OperatorConfig,
        catalog: Catalog,
        fallback: Fallback,
    ) -> Result<Self> {
        let key = RecordKey::new(PERMISSIONS_COLLECTION, &operator.email);
        let principal = match inner.load(&key).await? {
            Some(record) => Principal::from_permission_record(&record)?,
            None => match fallback {
                Fallback::Config => operator.principal(),
                Fallback::Bootstrap if inner.list(PERMISSIONS_COLLECTION).await?.is_empty() => {
                    tracing::warn!(
                        "[AuthorizedGateway] No permission records yet, {} acts as configured {}",
                        operator.email,
                        operator.role
                    );
                    operator.principal()
                }
                Fallback::Bootstrap => {
                    return Err(DashError::forbidden(format!(
                        "{} has no admin permissions",
                        operator.email
                    )));
                }
            },
        };
        Ok(Self::new(inner, principal, catalog))
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    fn check(&self, collection: &str, capability: Capability) -> Result<()> {
        let section = self.catalog.section_of(collection).ok_or_else(|| {
            DashError::forbidden(format!("unknown collection '{}'", collection))
        })?;
        self.principal.require(section, capability).inspect_err(|e| {
            tracing::warn!("[AuthorizedGateway] {}", e);
        })
    }
}

#[async_trait]
impl<G: PersistenceGateway> PersistenceGateway for AuthorizedGateway<G> {
    async fn load(&self, key: &RecordKey) -> Result<Option<Record>> {
        self.check(&key.collection, Capability::Read)?;
        self.inner.load(key).await
    }

    async fn save(&self, key: &RecordKey, record: &Record) -> Result<()> {
        self.check(&key.collection, Capability::Write)?;
        self.inner.save(key, record).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Record>> {
        self.check(collection, Capability::Read)?;
        self.inner.list(collection).await
    }

    async fn delete(&self, key: &RecordKey) -> Result<()> {
        self.check(&key.collection, Capability::Write)?;
        self.inner.delete(key).await
    }
}
