//! Declarative record schemas.
//!
//! A schema names the fields a screen edits, which of them are required,
//! and which carry an extra validator. The generic validation pass in
//! [`crate::validation`] evaluates it; no screen re-implements its checks.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::record::{Record, Value};

/// Pluggable per-field check. Receives the non-blank value and returns a
/// user-facing message on rejection.
pub type FieldValidator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// The kind of input a field is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Bool,
    Date,
    List,
    /// Comma-separated text. Hosted backends store it as an array of strings.
    TextList,
}

/// Declaration of one field.
#[derive(Clone)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub editable: bool,
    pub validator: Option<FieldValidator>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            editable: true,
            validator: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List)
    }

    pub fn text_list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::TextList)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn validate_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(f));
        self
    }

    /// The value a freshly created record starts with.
    pub fn blank_value(&self) -> Value {
        match self.kind {
            FieldKind::Bool => Value::Bool(false),
            FieldKind::List => Value::List(Vec::new()),
            _ => Value::Absent,
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("editable", &self.editable)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// The declared shape of one record type.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    entity: String,
    id_field: String,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub const DEFAULT_ID_FIELD: &'static str = "id";

    /// Creates a schema whose only field is the read-only `id`.
    pub fn new(entity: impl Into<String>) -> Self {
        Self::with_id_field(entity, Self::DEFAULT_ID_FIELD)
    }

    /// Creates a schema keyed by a custom identifier column.
    pub fn with_id_field(entity: impl Into<String>, id_field: impl Into<String>) -> Self {
        let id_field = id_field.into();
        Self {
            entity: entity.into(),
            fields: vec![FieldSpec::text(id_field.clone()).read_only()],
            id_field,
        }
    }

    /// Adds a field declaration. Redeclaring the id field only changes its
    /// kind; it always stays read-only.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        if spec.name == self.id_field {
            if let Some(existing) = self.fields.iter_mut().find(|f| f.name == spec.name) {
                existing.kind = spec.kind;
            }
            return self;
        }
        match self.fields.iter_mut().find(|f| f.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.fields.push(spec),
        }
        self
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_editable(&self, name: &str) -> bool {
        self.spec(name).is_some_and(|f| f.editable)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    /// A new record with every declared field present and the id set.
    pub fn blank_record(&self, id: impl Into<String>) -> Record {
        let mut record: Record = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.blank_value()))
            .collect();
        record.insert(self.id_field.clone(), Value::Text(id.into()));
        record
    }

    /// Fills in every declared field missing from loaded data so that the
    /// record carries the full declared shape. Extra stored columns are kept.
    pub fn conform(&self, mut record: Record) -> Record {
        for spec in &self.fields {
            if !record.contains(&spec.name) {
                record.insert(spec.name.clone(), spec.blank_value());
            }
        }
        record
    }
}
