//! Line-per-field schema listing.
//!
//! ```text
//! _ = {};
//! _.foo = {};
//! _.foo.bar = [];
//! _.foo.bar[0] = 1;
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::highlight::{highlight, Grammar};
use crate::query::RESERVED_NAMES;
use crate::type_name;

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaOptions {
    /// Append an aligned `// (type)` comment to each line.
    pub types: bool,
}

/// Walk `value` and return one assignment statement per node.
pub fn create_schema(value: &Value, opts: &SchemaOptions) -> Vec<String> {
    let mut rows: Vec<(String, &'static str)> = Vec::new();
    walk(value, "_".to_string(), &mut rows);

    if !opts.types {
        return rows.into_iter().map(|(stmt, _)| stmt).collect();
    }

    let width = rows.iter().map(|(stmt, _)| stmt.chars().count()).max().unwrap_or(0);
    rows.into_iter()
        .map(|(stmt, kind)| {
            let pad = width - stmt.chars().count();
            format!("{}{}  // ({})", stmt, " ".repeat(pad), kind)
        })
        .collect()
}

fn walk(value: &Value, path: String, rows: &mut Vec<(String, &'static str)>) {
    match value {
        Value::Object(map) => {
            rows.push((format!("{} = {{}};", path), type_name(value)));
            for (key, child) in map {
                walk(child, format!("{}{}", path, key_access(key)), rows);
            }
        }
        Value::Array(items) => {
            rows.push((format!("{} = [];", path), type_name(value)));
            for (i, child) in items.iter().enumerate() {
                walk(child, format!("{}[{}]", path, i), rows);
            }
        }
        scalar => rows.push((format!("{} = {};", path, scalar), type_name(scalar))),
    }
}

/// Dotted access when the key is a plain identifier, bracket access otherwise.
fn key_access(key: &str) -> String {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let re = IDENT.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid identifier regex")
    });

    if key != "_" && re.is_match(key) && !RESERVED_NAMES.contains(&key) {
        format!(".{}", key)
    } else {
        format!("[{}]", Value::String(key.to_string()))
    }
}

/// Highlight each schema line and join them with `<br>`.
pub fn html_output(lines: &[String], mono: bool) -> Result<String> {
    let body = lines
        .iter()
        .map(|line| highlight(line, Grammar::Schema, mono))
        .collect::<Result<Vec<_>>>()?
        .join("<br>");
    Ok(format!(r#"<div class="highlight schema">{}</div>"#, body))
}
