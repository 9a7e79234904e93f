//! Table views over fetched rows.
//!
//! Maps stored records into display rows for list screens, with optional
//! sorting on one column.

use std::cmp::Ordering;

use serde::Serialize;

use crate::record::{Record, Value};
use crate::schema::{FieldKind, RecordSchema};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Rows ready for display. Every row has one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Builds a view with the schema's non-list fields as columns.
    /// Blank values always sort last, whatever the direction.
    pub fn build(schema: &RecordSchema, mut rows: Vec<Record>, sort: Option<&SortSpec>) -> Self {
        let columns: Vec<String> = schema
            .fields()
            .iter()
            .filter(|f| f.kind != FieldKind::List)
            .map(|f| f.name.clone())
            .collect();

        if let Some(sort) = sort {
            let kind = schema.spec(&sort.field).map(|f| f.kind);
            rows.sort_by(|a, b| {
                let a = a.get(&sort.field).unwrap_or(&Value::Absent);
                let b = b.get(&sort.field).unwrap_or(&Value::Absent);
                match (a.is_blank(), b.is_blank()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => {
                        let ord = compare(kind, a, b);
                        if sort.descending { ord.reverse() } else { ord }
                    }
                }
            });
        }

        let rows = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(c).map(Value::display).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[index].as_str()).collect())
    }
}

fn compare(kind: Option<FieldKind>, a: &Value, b: &Value) -> Ordering {
    match kind {
        Some(FieldKind::Number) => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => text_order(a, b),
        },
        Some(FieldKind::Date) => match (a.as_date(), b.as_date()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => text_order(a, b),
        },
        _ => text_order(a, b),
    }
}

fn text_order(a: &Value, b: &Value) -> Ordering {
    a.display().to_lowercase().cmp(&b.display().to_lowercase())
}
