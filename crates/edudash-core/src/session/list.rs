//! List-of-records sessions.
//!
//! Benefits, curriculum sections, timeline entries, testimonials and FAQs
//! are edited as one ordered list. Items added locally carry a temporary id;
//! the whole list is persisted as one document (replace-all).

use std::sync::Arc;

use crate::error::SessionError;
use crate::gateway::RecordKey;
use crate::record::{Record, Value};
use crate::schema::RecordSchema;
use crate::validation::{self, ValidationError};

use super::editor::{EditSession, Editable};
use super::temp_id::{TempIdGenerator, id_suffix};

/// An ordered list of item records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordList {
    items: Vec<Record>,
}

impl RecordList {
    pub fn new(items: Vec<Record>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Record] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id_field: &str, id: &str) -> Option<&Record> {
        self.items
            .iter()
            .find(|item| item.id(id_field).as_deref() == Some(id))
    }

    pub fn into_items(self) -> Vec<Record> {
        self.items
    }
}

/// How a list is stored and how its new items are identified.
#[derive(Debug, Clone)]
pub struct ListSpec {
    item_schema: Arc<RecordSchema>,
    list_field: String,
    ids: TempIdGenerator,
}

impl ListSpec {
    /// List field name used when none is given.
    pub const DEFAULT_LIST_FIELD: &'static str = "items";

    pub fn new(item_schema: Arc<RecordSchema>, id_prefix: impl Into<String>) -> Self {
        Self {
            item_schema,
            list_field: Self::DEFAULT_LIST_FIELD.to_string(),
            ids: TempIdGenerator::new(id_prefix),
        }
    }

    pub fn with_list_field(mut self, list_field: impl Into<String>) -> Self {
        self.list_field = list_field.into();
        self
    }

    pub fn item_schema(&self) -> &RecordSchema {
        &self.item_schema
    }

    pub fn list_field(&self) -> &str {
        &self.list_field
    }

    pub fn id_prefix(&self) -> &str {
        self.ids.prefix()
    }

    /// Items stored in a document under the list field.
    pub fn items_of(&self, document: &Record) -> Vec<Record> {
        document
            .get(&self.list_field)
            .and_then(Value::as_list)
            .map(|items| items.to_vec())
            .unwrap_or_default()
    }

    fn prepare(&mut self, items: Vec<Record>) -> RecordList {
        let id_field = self.item_schema.id_field().to_string();
        let items = items
            .into_iter()
            .map(|item| {
                if let Some(id) = item.id(&id_field) {
                    self.ids.observe(&id);
                }
                self.item_schema.conform(item)
            })
            .collect();
        RecordList::new(items)
    }
}

impl Editable for RecordList {
    type Spec = ListSpec;

    fn entity(spec: &Self::Spec) -> &str {
        spec.item_schema.entity()
    }

    fn validate(&self, spec: &Self::Spec) -> Result<(), ValidationError> {
        validation::validate_items(&spec.item_schema, &spec.list_field, &self.items)
    }

    /// `{ id = <key id>, <list_field> = [items] }`
    fn to_document(&self, key: &RecordKey, spec: &Self::Spec) -> Record {
        Record::new()
            .with(RecordSchema::DEFAULT_ID_FIELD, key.id.clone())
            .with(spec.list_field.clone(), Value::List(self.items.clone()))
    }
}

/// Edit session over an ordered list of records.
pub type ListSession = EditSession<RecordList>;

impl EditSession<RecordList> {
    pub fn for_items(key: RecordKey, mut spec: ListSpec, items: Vec<Record>) -> Self {
        let list = spec.prepare(items);
        Self::new(key, spec, list)
    }

    /// Opens a session over a stored list document.
    pub fn from_document(key: RecordKey, spec: ListSpec, document: &Record) -> Self {
        let items = spec.items_of(document);
        Self::for_items(key, spec, items)
    }

    /// Replaces the session's data with a fresh load.
    pub fn reload_items(&mut self, items: Vec<Record>) {
        let list = self.spec_mut().prepare(items);
        self.reload(list);
    }

    pub fn items(&self) -> &[Record] {
        self.working().items()
    }

    pub fn item(&self, id: &str) -> Option<&Record> {
        let id_field = self.spec().item_schema.id_field();
        self.working().find(id_field, id)
    }

    /// Appends a blank item with a fresh temporary id; returns that id.
    pub fn add(&mut self) -> Result<String, SessionError> {
        self.edit("add an item", |working, spec| {
            let id = spec.ids.next_id();
            working.items.push(spec.item_schema.blank_record(id.clone()));
            Ok(id)
        })
    }

    /// Drops every item with this id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, SessionError> {
        self.edit("remove an item", |working, spec| {
            let id_field = spec.item_schema.id_field();
            let before = working.items.len();
            working
                .items
                .retain(|item| item.id(id_field).as_deref() != Some(id));
            Ok(working.items.len() != before)
        })
    }

    /// Field editor callback for one item.
    pub fn set_item_field(
        &mut self,
        id: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), SessionError> {
        let value = value.into();
        self.edit("edit an item", |working, spec| {
            let schema = &spec.item_schema;
            match schema.spec(field) {
                None => return Err(SessionError::UnknownField(field.to_string())),
                Some(f) if !f.editable => {
                    return Err(SessionError::ImmutableField(field.to_string()));
                }
                Some(_) => {}
            }
            let id_field = schema.id_field();
            let item = working
                .items
                .iter_mut()
                .find(|item| item.id(id_field).as_deref() == Some(id))
                .ok_or_else(|| SessionError::UnknownItem(id.to_string()))?;
            if item.set(field, value) {
                Ok(())
            } else {
                Err(SessionError::UnknownField(field.to_string()))
            }
        })
    }

    /// Stable ascending sort by the numeric suffix of each item's id.
    /// Items without a numeric suffix keep their relative order up front.
    pub fn sort_by_id_suffix(&mut self) -> Result<(), SessionError> {
        self.edit("reorder items", |working, spec| {
            let id_field = spec.item_schema.id_field();
            working
                .items
                .sort_by_key(|item| item.id(id_field).as_deref().and_then(id_suffix));
            Ok(())
        })
    }
}
