//! Query engines.
//!
//! `QueryEngine` is the seam between the web layer and whatever evaluates a
//! query. The built-in `PathEngine` understands jello-flavoured path
//! expressions:
//!
//! ```text
//! _                      the whole input
//! _.foo.bar[0]           attribute and index access
//! _["key with spaces"]   bracket access (required for reserved names)
//! _.items[-2:]           slices on arrays and strings
//! _.keys()  len(_)       methods and builtins
//! ```

mod eval;
mod lexer;
mod parser;

use serde_json::Value;

use crate::error::Result;

pub use parser::{parse, Expr, Subscript};

/// Names that resolve to methods of the object wrapper when accessed with
/// dotted notation. Reading a key with one of these names needs brackets.
pub const RESERVED_NAMES: &[&str] = &[
    "clear", "copy", "fromkeys", "get", "items", "keys", "pop", "popitem", "setdefault",
    "update", "values",
];

/// Evaluates a query string against already-loaded input.
pub trait QueryEngine: Send + Sync {
    fn name(&self) -> &'static str;

    fn query(&self, data: &Value, query: &str) -> Result<Value>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PathEngine;

impl QueryEngine for PathEngine {
    fn name(&self) -> &'static str {
        "path"
    }

    fn query(&self, data: &Value, query: &str) -> Result<Value> {
        let expr = parse(query)?;
        eval::eval(&expr, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(data: Value, q: &str) -> Result<Value> {
        PathEngine.query(&data, q)
    }

    fn sample() -> Value {
        json!({"foo": {"bar": [1, 2, 3]}, "name": "Jello", "items": ["x", "y"]})
    }

    #[test]
    fn test_select_existing_field() {
        assert_eq!(run(sample(), "_.foo").unwrap(), json!({"bar": [1, 2, 3]}));
        assert_eq!(run(sample(), "_.foo.bar[1]").unwrap(), json!(2));
        assert_eq!(run(sample(), "_").unwrap(), sample());
    }

    #[test]
    fn test_reserved_dotted_name_is_an_error() {
        let err = run(sample(), "_.items").unwrap_err();
        assert_eq!(err.kind(), "ReservedKeyError");
        assert!(err.to_string().contains("bracket"));

        assert_eq!(run(sample(), r#"_["items"]"#).unwrap(), json!(["x", "y"]));
    }

    #[test]
    fn test_syntax_error() {
        let err = run(sample(), "_.foo[").unwrap_err();
        assert_eq!(err.kind(), "QuerySyntaxError");

        let nested = format!("{}_{}", "len(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(run(sample(), &nested).unwrap_err().kind(), "QuerySyntaxError");
    }
}
