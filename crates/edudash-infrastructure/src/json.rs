//! Mapping between records and plain JSON rows.
//!
//! Hosted backends store records as ordinary JSON objects. The screen's
//! schema decides which strings are dates, which arrays are item lists and
//! which text fields travel as arrays of strings.

use chrono::NaiveDate;
use serde_json::{Map, Value as Json};

use edudash_core::catalog::{Screen, ScreenKind};
use edudash_core::error::Result;
use edudash_core::record::DATE_FORMAT;
use edudash_core::schema::{FieldKind, RecordSchema};
use edudash_core::{DashError, Record, Value};

/// Converts a record into a JSON object, guided by the screen when known.
pub fn record_to_json(record: &Record, screen: Option<&Screen>) -> Json {
    object_to_json(record, &Shape::of(screen))
}

fn object_to_json(record: &Record, shape: &Shape<'_>) -> Json {
    let object: Map<String, Json> = record
        .iter()
        .map(|(field, value)| {
            let kind = shape.kind_of(field);
            let item_shape = shape.item_shape(field);
            (field.to_string(), value_to_json(value, kind, &item_shape))
        })
        .collect();
    Json::Object(object)
}

fn value_to_json(value: &Value, kind: Option<FieldKind>, item_shape: &Shape<'_>) -> Json {
    match value {
        Value::Text(s) if kind == Some(FieldKind::TextList) => Json::Array(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| Json::String(part.to_string()))
                .collect(),
        ),
        Value::Text(s) => Json::String(s.clone()),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Value::Bool(b) => Json::Bool(*b),
        Value::Date(d) => Json::String(d.format(DATE_FORMAT).to_string()),
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|item| object_to_json(item, item_shape))
                .collect(),
        ),
        Value::Absent => Json::Null,
    }
}

/// Converts a JSON object into a record, guided by the screen when known.
pub fn record_from_json(json: Json, screen: Option<&Screen>) -> Result<Record> {
    object_to_record(json, &Shape::of(screen))
}

#[derive(Default)]
struct Shape<'a> {
    schema: Option<&'a RecordSchema>,
    /// A list field and the schema of its items.
    nested: Option<(&'a str, &'a RecordSchema)>,
}

impl<'a> Shape<'a> {
    fn of(screen: Option<&'a Screen>) -> Self {
        match screen.map(|s| &s.kind) {
            Some(ScreenKind::Single { schema }) => Shape {
                schema: Some(schema.as_ref()),
                nested: None,
            },
            Some(ScreenKind::List {
                item_schema,
                list_field,
                ..
            }) => Shape {
                schema: None,
                nested: Some((list_field.as_str(), item_schema.as_ref())),
            },
            None => Shape::default(),
        }
    }

    fn kind_of(&self, field: &str) -> Option<FieldKind> {
        self.schema.and_then(|s| s.spec(field)).map(|f| f.kind)
    }

    fn item_shape(&self, field: &str) -> Shape<'a> {
        match self.nested {
            Some((name, item_schema)) if name == field => Shape {
                schema: Some(item_schema),
                nested: None,
            },
            _ => Shape::default(),
        }
    }
}

fn object_to_record(json: Json, shape: &Shape<'_>) -> Result<Record> {
    let object = match json {
        Json::Object(object) => object,
        other => {
            return Err(DashError::Serialization {
                format: "JSON".to_string(),
                message: format!("expected an object, got {}", other),
            });
        }
    };

    let mut record = Record::new();
    for (field, value) in object {
        let kind = shape.kind_of(&field);
        let item_shape = shape.item_shape(&field);
        let value = value_from_json(value, kind, &item_shape)?;
        record.insert(field, value);
    }
    Ok(record)
}

fn value_from_json(json: Json, kind: Option<FieldKind>, item_shape: &Shape<'_>) -> Result<Value> {
    Ok(match json {
        Json::Null => Value::Absent,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Absent),
        Json::String(s) if kind == Some(FieldKind::Date) => {
            match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
                Ok(date) => Value::Date(date),
                Err(_) => Value::Text(s),
            }
        }
        Json::String(s) => Value::Text(s),
        // Array columns edited as text (e.g. granted sections).
        Json::Array(items) if matches!(kind, Some(FieldKind::Text | FieldKind::TextList)) => {
            Value::Text(join_scalars(&items))
        }
        Json::Array(items) if items.iter().all(Json::is_object) => Value::List(
            items
                .into_iter()
                .map(|item| object_to_record(item, item_shape))
                .collect::<Result<Vec<_>>>()?,
        ),
        Json::Array(items) => Value::Text(join_scalars(&items)),
        other @ Json::Object(_) => Value::Text(other.to_string()),
    })
}

fn join_scalars(items: &[Json]) -> String {
    items
        .iter()
        .map(|item| match item {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
