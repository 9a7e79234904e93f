//! Single-record sessions.

use std::sync::Arc;

use crate::error::SessionError;
use crate::gateway::RecordKey;
use crate::record::{Record, Value};
use crate::schema::RecordSchema;
use crate::validation::{self, ValidationError};

use super::editor::{EditSession, Editable};

impl Editable for Record {
    type Spec = Arc<RecordSchema>;

    fn entity(spec: &Self::Spec) -> &str {
        spec.entity()
    }

    fn validate(&self, spec: &Self::Spec) -> Result<(), ValidationError> {
        validation::validate(spec, self)
    }

    fn to_document(&self, _key: &RecordKey, _spec: &Self::Spec) -> Record {
        self.clone()
    }
}

/// Edit session over one record, e.g. a course or the home-page hero.
pub type RecordSession = EditSession<Record>;

impl EditSession<Record> {
    /// Opens a session over loaded data, conformed to the schema's shape.
    pub fn for_record(key: RecordKey, schema: Arc<RecordSchema>, record: Record) -> Self {
        let record = schema.conform(record);
        Self::new(key, schema, record)
    }

    /// Replaces the session's data with a fresh load.
    pub fn reload_record(&mut self, record: Record) {
        let record = self.spec().conform(record);
        self.reload(record);
    }

    /// Field editor callback: sets one declared, editable field.
    pub fn set_field(&mut self, field: &str, value: impl Into<Value>) -> Result<(), SessionError> {
        let value = value.into();
        self.edit("edit a field", |working, schema| {
            match schema.spec(field) {
                None => return Err(SessionError::UnknownField(field.to_string())),
                Some(spec) if !spec.editable => {
                    return Err(SessionError::ImmutableField(field.to_string()));
                }
                Some(_) => {}
            }
            if working.set(field, value) {
                Ok(())
            } else {
                Err(SessionError::UnknownField(field.to_string()))
            }
        })
    }

    /// Current value shown in the field editor (or the read-only view).
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.working().get(name)
    }

    pub fn schema(&self) -> &RecordSchema {
        self.spec()
    }
}
