//! JSON serialisation and HTML output of query results.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::error::Result;
use crate::highlight::{highlight, Grammar};

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub compact: bool,
    /// Emit arrays as JSON Lines, one compact document per element.
    pub lines: bool,
    pub indent: usize,
    pub mono: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self { compact: false, lines: false, indent: 2, mono: false }
    }
}

pub fn create_json(value: &Value, opts: &OutputOptions) -> Result<String> {
    if opts.lines {
        if let Value::Array(items) = value {
            let docs = items
                .iter()
                .map(serde_json::to_string)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            return Ok(docs.join("\n"));
        }
    }

    if opts.compact {
        return Ok(serde_json::to_string(value)?);
    }

    let indent = " ".repeat(opts.indent);
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn html_output(json: &str, mono: bool) -> Result<String> {
    let body = highlight(json, Grammar::Json, mono)?;
    Ok(format!(r#"<div class="highlight"><pre>{}</pre></div>"#, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pretty_default_indent() {
        let out = create_json(&json!({"bar": [1, 2, 3]}), &OutputOptions::default()).unwrap();
        assert_eq!(out, "{\n  \"bar\": [\n    1,\n    2,\n    3\n  ]\n}");
    }

    #[test]
    fn test_compact_changes_only_whitespace() {
        let value = json!({"b": [1, {"c": null}], "a": "x y"});
        let pretty = create_json(&value, &OutputOptions::default()).unwrap();
        let compact = create_json(&value, &OutputOptions { compact: true, ..Default::default() }).unwrap();
        assert_eq!(compact, r#"{"b":[1,{"c":null}],"a":"x y"}"#);
        let reparsed: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(reparsed, serde_json::from_str::<Value>(&compact).unwrap());
    }

    #[test]
    fn test_lines_output() {
        let opts = OutputOptions { lines: true, ..Default::default() };
        let out = create_json(&json!([{"a": 1}, 2, "s"]), &opts).unwrap();
        assert_eq!(out, "{\"a\":1}\n2\n\"s\"");

        let out = create_json(&json!({"a": 1}), &opts).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_custom_indent() {
        let opts = OutputOptions { indent: 4, ..Default::default() };
        assert_eq!(create_json(&json!([1]), &opts).unwrap(), "[\n    1\n]");
    }

    #[test]
    fn test_html_wraps_in_pre() {
        let html = html_output("1", true).unwrap();
        assert_eq!(html, r#"<div class="highlight"><pre>1</pre></div>"#);

        let html = html_output("[1]", false).unwrap();
        assert!(html.starts_with(r#"<div class="highlight"><pre><span class="p">[</span>"#));
    }
}
