//! CLI-output parsers: turn the text output of a command into JSON.

pub mod env;
pub mod kv;
pub mod logfmt;
pub mod table;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Keep every value as the string found in the input.
    pub raw: bool,
}

pub trait CliParser: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn parse(&self, input: &str, opts: &ParseOptions) -> Result<Value>;
}

/// Parsers selectable by name.
pub struct ParserRegistry {
    parsers: BTreeMap<&'static str, Box<dyn CliParser>>,
}

impl ParserRegistry {
    pub fn empty() -> Self {
        Self { parsers: BTreeMap::new() }
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(env::EnvParser));
        registry.register(Box::new(kv::KvParser));
        registry.register(Box::new(logfmt::LogfmtParser));
        registry.register(Box::new(table::TableParser));
        registry
    }

    /// Add a parser, replacing any parser registered under the same name.
    pub fn register(&mut self, parser: Box<dyn CliParser>) {
        self.parsers.insert(parser.name(), parser);
    }

    pub fn get(&self, name: &str) -> Result<&dyn CliParser> {
        self.parsers
            .get(name)
            .map(|p| p.as_ref())
            .ok_or_else(|| EngineError::UnknownParser(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// Parsers in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn CliParser> {
        self.parsers.values().map(|p| p.as_ref())
    }

    pub fn parse(&self, name: &str, input: &str, opts: &ParseOptions) -> Result<Value> {
        let parser = self.get(name)?;
        tracing::debug!(parser = name, bytes = input.len(), "Parsing command output");
        parser.parse(input, opts)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Strip one pair of matching surrounding quotes.
pub(crate) fn unquote(s: &str) -> &str {
    let s = s.trim();
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Integer, then float, then the original string.
pub(crate) fn convert_scalar(s: &str) -> Value {
    if let Ok(n) = s.parse::<i64>() {
        return Value::from(n);
    }
    if s.contains(['.', 'e', 'E']) {
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return Value::from(f);
            }
        }
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_names_sorted() {
        let registry = ParserRegistry::with_builtin();
        let names: Vec<_> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["env", "kv", "logfmt", "table"]);
    }

    #[test]
    fn test_unknown_parser() {
        let registry = ParserRegistry::with_builtin();
        let err = registry.parse("nope", "", &ParseOptions::default()).unwrap_err();
        assert_eq!(err.kind(), "UnknownParserError");
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#" "a b" "#), "a b");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("\"x'"), "\"x'");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn test_convert_scalar() {
        assert_eq!(convert_scalar("42"), json!(42));
        assert_eq!(convert_scalar("-1.5"), json!(-1.5));
        assert_eq!(convert_scalar("1.2.3"), json!("1.2.3"));
        assert_eq!(convert_scalar("inf"), json!("inf"));
        assert_eq!(convert_scalar("12G"), json!("12G"));
    }
}
