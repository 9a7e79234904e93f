//! Builds the configured gateway.

use std::sync::Arc;

use edudash_core::PersistenceGateway;
use edudash_core::catalog::Catalog;
use edudash_core::config::{BackendConfig, DashConfig};
use edudash_core::error::Result;

use crate::authorized_gateway::{AuthorizedGateway, Fallback};
use crate::file_gateway::TomlFileGateway;
use crate::rest_gateway::RestGateway;

/// Opens the backend named in `config`, guarded by the operator's stored
/// permissions.
///
/// File storage is single-user, so the config role applies when no
/// permission record exists. A hosted backend only trusts the config role
/// until the first permission record is written.
pub async fn open_gateway(
    config: &DashConfig,
    catalog: &Catalog,
) -> Result<Arc<dyn PersistenceGateway>> {
    let operator = &config.operator;

    Ok(match &config.backend {
        BackendConfig::File => {
            let gateway = TomlFileGateway::new(config.data_dir.as_deref())?;
            tracing::debug!(
                "[Backend] File storage at {}",
                gateway.collections_dir().display()
            );
            let guarded =
                AuthorizedGateway::for_operator(gateway, operator, catalog.clone(), Fallback::Config)
                    .await?;
            log_principal(&guarded);
            Arc::new(guarded)
        }
        BackendConfig::Rest(rest) => {
            let gateway = RestGateway::from_env(rest, catalog.clone())?;
            let guarded = AuthorizedGateway::for_operator(
                gateway,
                operator,
                catalog.clone(),
                Fallback::Bootstrap,
            )
            .await?;
            log_principal(&guarded);
            Arc::new(guarded)
        }
    })
}

fn log_principal<G: PersistenceGateway>(gateway: &AuthorizedGateway<G>) {
    let principal = gateway.principal();
    tracing::debug!(
        "[Backend] Operator {} acting as {}",
        principal.email,
        principal.role
    );
}
