//! Field validators shared by the standard screens.
//!
//! Validators only see non-blank values; required-ness and number parsing
//! are handled by the generic validation pass.

use std::sync::LazyLock;

use regex::Regex;

use crate::access::{Role, parse_sections};
use crate::record::Value;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid url regex"));

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));

static PROMO_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_-]{3,20}$").expect("valid promo code regex"));

fn text(value: &Value) -> String {
    value.display().trim().to_string()
}

pub fn email(value: &Value) -> Result<(), String> {
    if EMAIL.is_match(&text(value)) {
        Ok(())
    } else {
        Err("must be an email address".to_string())
    }
}

pub fn url(value: &Value) -> Result<(), String> {
    if URL.is_match(&text(value)) {
        Ok(())
    } else {
        Err("must be an http(s) link".to_string())
    }
}

pub fn slug(value: &Value) -> Result<(), String> {
    if SLUG.is_match(&text(value)) {
        Ok(())
    } else {
        Err("use lowercase letters, digits and dashes".to_string())
    }
}

pub fn promo_code(value: &Value) -> Result<(), String> {
    if PROMO_CODE.is_match(&text(value)) {
        Ok(())
    } else {
        Err("use 3-20 uppercase letters, digits, '-' or '_'".to_string())
    }
}

pub fn non_negative(value: &Value) -> Result<(), String> {
    match value.as_number() {
        Some(n) if n < 0.0 => Err("must not be negative".to_string()),
        _ => Ok(()),
    }
}

pub fn whole_number(value: &Value) -> Result<(), String> {
    match value.as_number() {
        Some(n) if n < 0.0 || n.fract() != 0.0 => Err("must be a whole number".to_string()),
        _ => Ok(()),
    }
}

/// Inclusive numeric range.
pub fn in_range(min: f64, max: f64) -> impl Fn(&Value) -> Result<(), String> + Send + Sync {
    move |value| match value.as_number() {
        Some(n) if n < min || n > max => Err(format!("must be between {} and {}", min, max)),
        _ => Ok(()),
    }
}

/// Case-insensitive membership in a fixed set of options.
pub fn one_of(options: &'static [&'static str]) -> impl Fn(&Value) -> Result<(), String> + Send + Sync {
    move |value| {
        let given = text(value).to_lowercase();
        if options.iter().any(|o| *o == given) {
            Ok(())
        } else {
            Err(format!("must be one of: {}", options.join(", ")))
        }
    }
}

pub fn role(value: &Value) -> Result<(), String> {
    text(value)
        .parse::<Role>()
        .map(|_| ())
        .map_err(|_| "must be owner or admin".to_string())
}

pub fn sections(value: &Value) -> Result<(), String> {
    parse_sections(&text(value))
        .map(|_| ())
        .map_err(|e| match e {
            crate::error::DashError::Config(msg) => msg,
            other => other.to_string(),
        })
}
