//! jelloweb-engine — the query/transform side of jello-web.
//!
//!   - JSON / JSON Lines input loading
//!   - Path queries behind the `QueryEngine` trait
//!   - Schema listings and JSON output, highlighted for HTML
//!   - CLI-output parsers selectable by name

pub mod error;
pub mod loader;
pub mod query;
pub mod schema;
pub mod render;
pub mod highlight;
pub mod cli;
pub mod transform;

use serde_json::Value;

pub use cli::{CliParser, ParseOptions, ParserRegistry};
pub use error::{EngineError, Result};
pub use highlight::Grammar;
pub use loader::load_json;
pub use query::{PathEngine, QueryEngine};
pub use transform::{transform, QueryOptions, Stage, TransformError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON type name used in messages and schema annotations.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}
