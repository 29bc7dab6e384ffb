//! Key/value files: `key = value` or `key: value`, one pair per line.

use serde_json::{Map, Value};

use super::{unquote, CliParser, ParseOptions};
use crate::error::{EngineError, Result};

pub struct KvParser;

impl CliParser for KvParser {
    fn name(&self) -> &'static str {
        "kv"
    }

    fn description(&self) -> &'static str {
        "key/value files such as /etc/os-release (key = value or key: value)"
    }

    fn parse(&self, input: &str, _opts: &ParseOptions) -> Result<Value> {
        let mut map = Map::new();

        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            // Whichever separator comes first wins, so `url = http://x` keeps its colon.
            let sep = line
                .find(['=', ':'])
                .ok_or_else(|| {
                    EngineError::Parser(format!(
                        "line {}: expected key = value or key: value, found {:?}",
                        idx + 1,
                        line
                    ))
                })?;

            let key = line[..sep].trim();
            if key.is_empty() {
                return Err(EngineError::Parser(format!("line {}: empty key", idx + 1)));
            }
            let value = unquote(&line[sep + 1..]);
            map.insert(key.to_string(), Value::String(value.to_string()));
        }

        Ok(Value::Object(map))
    }
}
