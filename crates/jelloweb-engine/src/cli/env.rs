//! `env` / `printenv` output.

use serde_json::{json, Value};

use super::{unquote, CliParser, ParseOptions};
use crate::error::{EngineError, Result};

pub struct EnvParser;

impl CliParser for EnvParser {
    fn name(&self) -> &'static str {
        "env"
    }

    fn description(&self) -> &'static str {
        "`env` and `printenv` output, or a .env file"
    }

    fn parse(&self, input: &str, _opts: &ParseOptions) -> Result<Value> {
        let mut vars: Vec<(String, String)> = Vec::new();

        for (idx, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let trimmed = line.strip_prefix("export ").unwrap_or(line);
            match trimmed.split_once('=') {
                Some((name, value)) if is_var_name(name) => {
                    vars.push((name.to_string(), unquote(value).to_string()));
                }
                // Multi-line values continue until the next NAME=... line
                _ => match vars.last_mut() {
                    Some((_, value)) => {
                        value.push('\n');
                        value.push_str(line);
                    }
                    None => {
                        return Err(EngineError::Parser(format!(
                            "line {}: expected NAME=value, found {:?}",
                            idx + 1,
                            line
                        )))
                    }
                },
            }
        }

        Ok(Value::Array(
            vars.into_iter()
                .map(|(name, value)| json!({"name": name, "value": value}))
                .collect(),
        ))
    }
}

fn is_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Value> {
        EnvParser.parse(input, &ParseOptions::default())
    }

    #[test]
    fn test_basic_env() {
        let out = parse("HOME=/root\nexport TERM=\"xterm\"\nEMPTY=\n").unwrap();
        assert_eq!(
            out,
            json!([
                {"name": "HOME", "value": "/root"},
                {"name": "TERM", "value": "xterm"},
                {"name": "EMPTY", "value": ""}
            ])
        );
    }

    #[test]
    fn test_multiline_value() {
        let out = parse("A=one\ntwo three\n\nB=x\n\n").unwrap();
        assert_eq!(out[0]["value"], json!("one\ntwo three"));
        assert_eq!(out[1]["name"], json!("B"));
    }

    #[test]
    fn test_value_containing_equals() {
        let out = parse("OPTS=a=b").unwrap();
        assert_eq!(out[0]["value"], json!("a=b"));
    }

    #[test]
    fn test_garbage_first_line() {
        let err = parse("not an env line").unwrap_err();
        assert_eq!(err.kind(), "ParserError");
    }
}
