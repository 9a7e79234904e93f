//! Hosted backend gateway.
//!
//! Talks to a PostgREST-style endpoint (the REST surface of common
//! backend-as-a-service offerings). Each collection is a table, each record
//! a row keyed by the screen's id column.

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value as Json;

use edudash_core::catalog::{Catalog, ScreenKind};
use edudash_core::config::RestBackendConfig;
use edudash_core::error::Result;
use edudash_core::schema::RecordSchema;
use edudash_core::{DashError, PersistenceGateway, Record, RecordKey};

use crate::json::{record_from_json, record_to_json};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Gateway over a hosted REST backend.
#[derive(Clone)]
pub struct RestGateway {
    client: Client,
    base_url: String,
    api_key: String,
    catalog: Catalog,
    conflict_columns: BTreeMap<String, String>,
}

impl RestGateway {
    pub fn new(config: &RestBackendConfig, api_key: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            catalog,
            conflict_columns: config.conflict_columns.clone(),
        }
    }

    /// Reads the API key from the environment variable named in the config.
    pub fn from_env(config: &RestBackendConfig, catalog: Catalog) -> Result<Self> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            DashError::config(format!(
                "Environment variable {} is not set",
                config.api_key_env
            ))
        })?;
        tracing::info!("[RestGateway] Using backend at {}", config.base_url);
        Ok(Self::new(config, api_key, catalog))
    }

    fn table_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    /// Column that identifies a row of this collection.
    fn id_column(&self, collection: &str) -> &str {
        match self.catalog.by_collection(collection).map(|s| &s.kind) {
            Some(ScreenKind::Single { schema }) => schema.id_field(),
            _ => RecordSchema::DEFAULT_ID_FIELD,
        }
    }

    /// Upsert conflict target; the id column unless configured otherwise.
    fn conflict_column(&self, collection: &str) -> &str {
        self.conflict_columns
            .get(collection)
            .map(String::as_str)
            .unwrap_or_else(|| self.id_column(collection))
    }

    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(REQUEST_TIMEOUT)
    }

    fn key_filter(&self, key: &RecordKey) -> [(String, String); 1] {
        [(
            self.id_column(&key.collection).to_string(),
            format!("eq.{}", key.id),
        )]
    }

    fn load_request(&self, key: &RecordKey) -> RequestBuilder {
        self.auth_request(
            self.client
                .get(self.table_url(&key.collection))
                .query(&[("select", "*")])
                .query(&self.key_filter(key)),
        )
    }

    fn list_request(&self, collection: &str) -> RequestBuilder {
        self.auth_request(
            self.client
                .get(self.table_url(collection))
                .query(&[("select", "*")]),
        )
    }

    fn save_request(&self, key: &RecordKey, record: &Record) -> RequestBuilder {
        let mut body = record_to_json(record, self.catalog.by_collection(&key.collection));
        if let Json::Object(object) = &mut body {
            object
                .entry(self.id_column(&key.collection))
                .or_insert_with(|| Json::String(key.id.clone()));
        }
        self.auth_request(
            self.client
                .post(self.table_url(&key.collection))
                .query(&[("on_conflict", self.conflict_column(&key.collection))])
                .header("Prefer", "resolution=merge-duplicates")
                .json(&body),
        )
    }

    fn delete_request(&self, key: &RecordKey) -> RequestBuilder {
        self.auth_request(
            self.client
                .delete(self.table_url(&key.collection))
                .query(&self.key_filter(key)),
        )
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| DashError::data_access(format!("Failed to {}: {}", action, e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!("[RestGateway] {} failed with {}: {}", action, status, error_text);
        Err(DashError::data_access(format!(
            "Failed to {} ({}): {}",
            action, status, error_text
        )))
    }

    async fn rows(&self, collection: &str, response: Response) -> Result<Vec<Record>> {
        let rows: Vec<Json> = response
            .json()
            .await
            .map_err(|e| DashError::data_access(format!("Invalid response body: {}", e)))?;
        let screen = self.catalog.by_collection(collection);
        rows.into_iter()
            .map(|row| record_from_json(row, screen))
            .collect()
    }
}

#[async_trait]
impl PersistenceGateway for RestGateway {
    async fn load(&self, key: &RecordKey) -> Result<Option<Record>> {
        let response = self
            .send(self.load_request(key), &format!("load {}", key))
            .await?;
        let rows = self.rows(&key.collection, response).await?;
        Ok(rows.into_iter().next())
    }

    async fn save(&self, key: &RecordKey, record: &Record) -> Result<()> {
        self.send(self.save_request(key, record), &format!("save {}", key))
            .await?;
        tracing::debug!("[RestGateway] Saved {}", key);
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Record>> {
        let response = self
            .send(self.list_request(collection), &format!("list {}", collection))
            .await?;
        self.rows(collection, response).await
    }

    async fn delete(&self, key: &RecordKey) -> Result<()> {
        self.send(self.delete_request(key), &format!("delete {}", key))
            .await?;
        tracing::debug!("[RestGateway] Deleted {}", key);
        Ok(())
    }
}
