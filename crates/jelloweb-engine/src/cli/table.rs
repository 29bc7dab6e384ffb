//! Whitespace-aligned tables with a header row (`ps`, `df`, `lsblk`, ...).

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::{convert_scalar, CliParser, ParseOptions};
use crate::error::{EngineError, Result};

pub struct TableParser;

fn whitespace() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex"))
}

impl CliParser for TableParser {
    fn name(&self) -> &'static str {
        "table"
    }

    fn description(&self) -> &'static str {
        "whitespace-separated tables with a header row, e.g. ps, df"
    }

    fn parse(&self, input: &str, opts: &ParseOptions) -> Result<Value> {
        let mut lines = input.lines().map(str::trim).filter(|l| !l.is_empty());

        let header = lines
            .next()
            .ok_or_else(|| EngineError::Parser("no header row found".to_string()))?;
        let columns = header_names(header);

        let rows = lines
            .map(|line| {
                let mut row = Map::new();
                let mut cells = whitespace().splitn(line, columns.len());
                for column in &columns {
                    let value = match cells.next() {
                        Some(cell) if opts.raw => Value::String(cell.to_string()),
                        Some(cell) => convert_scalar(cell),
                        None => Value::Null,
                    };
                    row.insert(column.clone(), value);
                }
                Value::Object(row)
            })
            .collect();

        Ok(Value::Array(rows))
    }
}

/// Lowercase snake_case column names; duplicates get their position appended.
fn header_names(header: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for (i, raw) in whitespace().split(header).enumerate() {
        let mut name = String::new();
        for c in raw.chars() {
            if c.is_alphanumeric() {
                name.extend(c.to_lowercase());
            } else if c == '%' {
                name.push_str("_percent");
            } else if !name.ends_with('_') {
                name.push('_');
            }
        }
        let mut name = name.trim_matches('_').to_string();
        if name.is_empty() {
            name = format!("column_{}", i);
        }
        if names.contains(&name) {
            name = format!("{}_{}", name, i);
        }
        names.push(name);
    }
    names
}
