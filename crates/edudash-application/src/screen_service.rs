//! Screen use cases.
//!
//! `ScreenService` turns catalog screens into edit sessions and table views,
//! and runs saves through the gateway with notices forwarded to the
//! configured [`Notifier`].

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use uuid::Uuid;

use edudash_core::catalog::{Catalog, Screen};
use edudash_core::gateway::load_required;
use edudash_core::schema::{FieldSpec, RecordSchema};
use edudash_core::session::{EditSession, Editable, ListSession, RecordSession, SaveOutcome};
use edudash_core::view::{SortSpec, TableView};
use edudash_core::{PersistenceGateway, Record, RecordKey};

use crate::notifier::Notifier;

pub struct ScreenService {
    gateway: Arc<dyn PersistenceGateway>,
    catalog: Catalog,
    notifier: Arc<dyn Notifier>,
}

impl ScreenService {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        catalog: Catalog,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            catalog,
            notifier,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn screen(&self, name: &str) -> Result<&Screen> {
        self.catalog
            .screen(name)
            .ok_or_else(|| anyhow!("Unknown screen '{}'", name))
    }

    /// Loads one record into a `Viewing` session. Missing records are an
    /// error; there is nothing to show or edit.
    pub async fn open_record(&self, screen: &str, id: &str) -> Result<RecordSession> {
        let screen = self.single_screen(screen)?;
        let key = RecordKey::new(&screen.collection, id);
        let record = load_required(self.gateway.as_ref(), &key).await?;
        tracing::debug!("[ScreenService] Opened {}", key);
        Ok(RecordSession::for_record(key, screen.schema().clone(), record))
    }

    /// Loads a list document into a `Viewing` session. A list that was
    /// never saved opens empty.
    pub async fn open_list(&self, screen: &str, key_id: &str) -> Result<ListSession> {
        let screen = self.screen(screen)?;
        let spec = screen
            .list_spec()
            .ok_or_else(|| anyhow!("Screen '{}' does not edit a list", screen.name))?;
        let key = RecordKey::new(&screen.collection, key_id);

        let document = self
            .gateway
            .load(&key)
            .await
            .with_context(|| format!("Failed to load {}", key))?
            .unwrap_or_default();
        tracing::debug!("[ScreenService] Opened list {}", key);
        Ok(ListSession::from_document(key, spec, &document))
    }

    /// Starts a session for a record that does not exist yet, already in
    /// `Editing`. Without an explicit id a UUID is generated.
    pub fn new_record(&self, screen: &str, id: Option<&str>) -> Result<RecordSession> {
        let screen = self.single_screen(screen)?;
        let id = match id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            Some(_) => bail!("Record id must not be blank"),
            None => Uuid::new_v4().to_string(),
        };
        let schema = screen.schema().clone();
        let key = RecordKey::new(&screen.collection, &id);
        let record = schema.blank_record(id);

        let mut session = RecordSession::for_record(key, schema, record);
        session.start_edit()?;
        Ok(session)
    }

    /// Saves through the gateway and forwards the resulting notice.
    pub async fn save<D: Editable>(&self, session: &mut EditSession<D>) -> Result<SaveOutcome> {
        let outcome = session.save(self.gateway.as_ref()).await?;

        match &outcome {
            SaveOutcome::Saved(_) => tracing::info!("[ScreenService] Saved {}", session.key()),
            SaveOutcome::Invalid(err) => {
                tracing::debug!("[ScreenService] Save of {} blocked: {}", session.key(), err)
            }
            SaveOutcome::Failed(err) => tracing::warn!("[ScreenService] {}", err),
        }
        if let Some(notice) = session.take_notice() {
            self.notifier.notify(&notice);
        }
        Ok(outcome)
    }

    /// Re-fetches a record session's data from the gateway.
    pub async fn refresh_record(&self, session: &mut RecordSession) -> Result<()> {
        let record = load_required(self.gateway.as_ref(), session.key()).await?;
        session.reload_record(record);
        Ok(())
    }

    /// Re-fetches a list session's data from the gateway.
    pub async fn refresh_list(&self, session: &mut ListSession) -> Result<()> {
        let document = self
            .gateway
            .load(session.key())
            .await
            .with_context(|| format!("Failed to load {}", session.key()))?
            .unwrap_or_default();
        let items = session.spec().items_of(&document);
        session.reload_items(items);
        Ok(())
    }

    /// Rows of a screen's collection as a table. List screens show one row
    /// per stored list with its item count.
    pub async fn list_rows(&self, screen: &str, sort: Option<&SortSpec>) -> Result<TableView> {
        let screen = self.screen(screen)?;
        let rows = self
            .gateway
            .list(&screen.collection)
            .await
            .with_context(|| format!("Failed to list {}", screen.collection))?;

        match screen.list_spec() {
            None => Ok(TableView::build(screen.schema(), rows, sort)),
            Some(spec) => {
                let summary_schema = RecordSchema::new(screen.schema().entity())
                    .field(FieldSpec::number("items"));
                let id_field = RecordSchema::DEFAULT_ID_FIELD;
                let summaries = rows
                    .iter()
                    .map(|document| {
                        let count = spec.items_of(document).len() as f64;
                        Record::new()
                            .with(id_field, document.get(id_field).cloned().unwrap_or_default())
                            .with("items", count)
                    })
                    .collect();
                Ok(TableView::build(&summary_schema, summaries, sort))
            }
        }
    }

    /// Removes a stored record or list document.
    pub async fn delete(&self, screen: &str, id: &str) -> Result<()> {
        let screen = self.screen(screen)?;
        let key = RecordKey::new(&screen.collection, id);
        self.gateway
            .delete(&key)
            .await
            .with_context(|| format!("Failed to delete {}", key))?;
        tracing::info!("[ScreenService] Deleted {}", key);
        Ok(())
    }

    fn single_screen(&self, name: &str) -> Result<&Screen> {
        let screen = self.screen(name)?;
        if screen.is_list() {
            bail!("Screen '{}' edits a list; use the list commands", name);
        }
        Ok(screen)
    }
}
