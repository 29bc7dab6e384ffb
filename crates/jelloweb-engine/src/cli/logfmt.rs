//! logfmt lines (`level=info msg="started" port=80`).

use serde_json::{Map, Value};

use super::{convert_scalar, CliParser, ParseOptions};
use crate::error::{EngineError, Result};

pub struct LogfmtParser;

impl CliParser for LogfmtParser {
    fn name(&self) -> &'static str {
        "logfmt"
    }

    fn description(&self) -> &'static str {
        "logfmt key=value log lines, one object per line"
    }

    fn parse(&self, input: &str, opts: &ParseOptions) -> Result<Value> {
        let mut records = Vec::new();

        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            // `parse` returns every pair it could read; an empty result means nothing was logfmt.
            let pairs = ::logfmt::parse(line);
            if pairs.is_empty() {
                return Err(EngineError::Parser(format!(
                    "line {}: not a valid logfmt line",
                    idx + 1
                )));
            }

            let mut map = Map::new();
            for pair in pairs {
                let value = match pair.val {
                    Some(v) if opts.raw => Value::String(v),
                    Some(v) => convert_scalar(&v),
                    // Bare keys are flags.
                    None => Value::Bool(true),
                };
                map.insert(pair.key, value);
            }
            records.push(Value::Object(map));
        }

        Ok(Value::Array(records))
    }
}
