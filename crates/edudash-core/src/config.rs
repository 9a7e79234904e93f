//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::access::{Principal, Role, Section};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DashConfig {
    /// Default tracing filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides the platform data directory for file storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub operator: OperatorConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: None,
            backend: BackendConfig::default(),
            operator: OperatorConfig::default(),
        }
    }
}

/// Where records live.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// TOML files under the data directory.
    #[default]
    File,
    /// Hosted backend-as-a-service REST endpoint.
    Rest(RestBackendConfig),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RestBackendConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Upsert conflict column per collection; the id field otherwise.
    #[serde(default)]
    pub conflict_columns: BTreeMap<String, String>,
}

fn default_api_key_env() -> String {
    "EDUDASH_API_KEY".to_string()
}

/// The person running the dashboard.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct OperatorConfig {
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            email: "owner@localhost".to_string(),
            role: Role::Owner,
            sections: Vec::new(),
        }
    }
}

impl OperatorConfig {
    pub fn principal(&self) -> Principal {
        match self.role {
            Role::Owner => Principal::owner(self.email.clone()),
            Role::Admin => Principal::admin(self.email.clone(), self.sections.iter().copied()),
        }
    }
}
