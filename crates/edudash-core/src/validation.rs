//! Pre-save validation.
//!
//! Validation is local and synchronous. It runs against the working copy
//! before any gateway call and reports every offending field at once.

use std::fmt;

use crate::record::{Record, Value};
use crate::schema::{FieldKind, RecordSchema};

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    /// Required field is absent or whitespace-only.
    Missing,
    /// Number field that does not parse to a number.
    NotNumeric,
    /// Date field that is not a `YYYY-MM-DD` date.
    NotADate,
    /// Rejected by the field's own validator.
    Invalid(String),
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Missing => f.write_str("required"),
            IssueKind::NotNumeric => f.write_str("not a number"),
            IssueKind::NotADate => f.write_str("not a date"),
            IssueKind::Invalid(msg) => f.write_str(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
}

/// All problems found in one validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Names of the offending fields, in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Please fix: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} ({})", issue.field, issue.kind)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Checks a record against its schema.
pub fn validate(schema: &RecordSchema, record: &Record) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    collect_issues(schema, record, "", &mut issues);
    finish(issues)
}

/// Checks every item of a list. Issues are reported as
/// `"{list_field}[{index}].{field}"`.
pub fn validate_items(
    schema: &RecordSchema,
    list_field: &str,
    items: &[Record],
) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let prefix = format!("{}[{}].", list_field, index);
        collect_issues(schema, item, &prefix, &mut issues);
    }
    finish(issues)
}

fn finish(issues: Vec<FieldIssue>) -> Result<(), ValidationError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

fn collect_issues(schema: &RecordSchema, record: &Record, prefix: &str, out: &mut Vec<FieldIssue>) {
    for spec in schema.fields() {
        let value = record.get(&spec.name).unwrap_or(&Value::Absent);
        let kind = if value.is_blank() {
            spec.required.then_some(IssueKind::Missing)
        } else {
            check_kind(spec.kind, value).or_else(|| {
                spec.validator
                    .as_ref()
                    .and_then(|check| check(value).err())
                    .map(IssueKind::Invalid)
            })
        };
        if let Some(kind) = kind {
            out.push(FieldIssue {
                field: format!("{}{}", prefix, spec.name),
                kind,
            });
        }
    }
}

fn check_kind(kind: FieldKind, value: &Value) -> Option<IssueKind> {
    match kind {
        FieldKind::Number if value.as_number().is_none() => Some(IssueKind::NotNumeric),
        FieldKind::Date if value.as_date().is_none() => Some(IssueKind::NotADate),
        FieldKind::Bool if value.as_bool().is_none() => {
            Some(IssueKind::Invalid("expected yes or no".to_string()))
        }
        FieldKind::List if value.as_list().is_none() => {
            Some(IssueKind::Invalid("expected a list".to_string()))
        }
        _ => None,
    }
}
