//! JSON / JSON Lines input loading.

use serde_json::Value;

use crate::error::{EngineError, Result};

/// Parse `text` as a single JSON document, falling back to JSON Lines.
///
/// JSON Lines input yields an array with one element per non-blank line.
pub fn load_json(text: &str) -> Result<Value> {
    let doc_err = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(EngineError::Decode(doc_err.to_string()));
    }

    let mut docs = Vec::with_capacity(lines.len());
    for (idx, line) in lines {
        let value = serde_json::from_str::<Value>(line).map_err(|e| {
            EngineError::Decode(format!(
                "{}\nJSON Lines parse failed on line {}: {}",
                doc_err,
                idx + 1,
                e
            ))
        })?;
        docs.push(value);
    }
    Ok(Value::Array(docs))
}
