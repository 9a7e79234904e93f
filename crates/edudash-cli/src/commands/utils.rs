use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use colored::Colorize;

use edudash_application::Notifier;
use edudash_core::record::DATE_FORMAT;
use edudash_core::schema::{FieldKind, FieldSpec, RecordSchema};
use edudash_core::session::{Notice, NoticeLevel};
use edudash_core::view::TableView;
use edudash_core::{Record, Value};

/// Prints notices to the terminal.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", format!("✓ {}", notice.message).green()),
            NoticeLevel::Failure => eprintln!("{}", format!("✗ {}", notice.message).red()),
        }
    }
}

/// Splits `field=value`. The value may be empty (clears the field).
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected FIELD=VALUE, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        bail!("Missing field name in '{}'", raw);
    }
    Ok((field.to_string(), value.to_string()))
}

/// Resolves each assignment against the schema and converts the input.
pub fn resolve_assignments(schema: &RecordSchema, sets: &[String]) -> Result<Vec<(String, Value)>> {
    sets.iter()
        .map(|raw| {
            let (field, input) = parse_assignment(raw)?;
            let spec = schema
                .spec(&field)
                .ok_or_else(|| anyhow!("{} has no field '{}'", schema.entity(), field))?;
            Ok((field, parse_input(spec, &input)))
        })
        .collect()
}

/// Converts text input according to the field's kind.
///
/// Input that does not parse is kept as text so that validation reports
/// the field by name. Blank input clears the field.
pub fn parse_input(spec: &FieldSpec, raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return spec.blank_value();
    }
    match spec.kind {
        FieldKind::Number => trimmed
            .parse::<f64>()
            .map(Value::Number)
            .unwrap_or_else(|_| Value::Text(raw.to_string())),
        FieldKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "on" => Value::Bool(true),
            "false" | "no" | "n" | "0" | "off" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        },
        FieldKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .map(Value::Date)
            .unwrap_or_else(|_| Value::Text(raw.to_string())),
        FieldKind::Text | FieldKind::TextList | FieldKind::List => Value::Text(raw.to_string()),
    }
}

pub fn print_table(view: &TableView) {
    if view.is_empty() {
        println!("{}", "(no rows)".dimmed());
        return;
    }

    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            view.rows
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect();
    println!("{}", header.join("  ").bold());

    for row in &view.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect();
        println!("{}", cells.join("  "));
    }
}

/// Prints a record field by field in schema order.
pub fn print_record(schema: &RecordSchema, record: &Record) {
    let width = schema
        .fields()
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0);
    for spec in schema.fields() {
        let value = record.get(&spec.name).map(Value::display).unwrap_or_default();
        let name = format!("{:<w$}", spec.name, w = width);
        println!("{}  {}", name.cyan(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edudash_core::catalog::Catalog;
    use edudash_core::validation::validate;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("title=Rust = fun").unwrap(),
            ("title".to_string(), "Rust = fun".to_string())
        );
        assert_eq!(
            parse_assignment("fee=").unwrap(),
            ("fee".to_string(), String::new())
        );
        assert!(parse_assignment("title").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_parse_input_by_kind() {
        assert_eq!(parse_input(&FieldSpec::number("fee"), " 900 "), Value::Number(900.0));
        assert_eq!(
            parse_input(&FieldSpec::number("fee"), "abc"),
            Value::Text("abc".to_string())
        );
        assert_eq!(parse_input(&FieldSpec::boolean("published"), "Yes"), Value::Bool(true));
        assert_eq!(parse_input(&FieldSpec::boolean("published"), ""), Value::Bool(false));
        assert_eq!(
            parse_input(&FieldSpec::date("start_date"), "2025-03-01"),
            Value::Date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
        assert_eq!(parse_input(&FieldSpec::text("title"), "  "), Value::Absent);
    }

    #[test]
    fn test_resolve_assignments_rejects_unknown_field() {
        let schema = RecordSchema::new("course").field(FieldSpec::number("fee"));
        let resolved = resolve_assignments(&schema, &["fee=12".to_string()]).unwrap();
        assert_eq!(resolved, vec![("fee".to_string(), Value::Number(12.0))]);

        let err = resolve_assignments(&schema, &["colour=red".to_string()]).unwrap_err();
        assert!(err.to_string().contains("no field 'colour'"));
    }

    #[test]
    fn test_infinite_fee_fails_validation() {
        let catalog = Catalog::standard();
        let schema = catalog.screen("courses").unwrap().schema();
        let record = schema
            .blank_record("c1")
            .with("title", "Rust Basics")
            .with("slug", "rust-basics");

        for input in ["inf", "1e999"] {
            let (field, value) = resolve_assignments(schema, &[format!("fee={}", input)])
                .unwrap()
                .remove(0);
            let err = validate(schema, &record.clone().with(field, value)).unwrap_err();
            assert_eq!(err.fields(), vec!["fee"]);
        }
    }
}
