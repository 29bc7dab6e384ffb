//! Load → query → render, with the per-request options passed in explicitly.

use crate::error::EngineError;
use crate::loader::load_json;
use crate::query::QueryEngine;
use crate::render::{self, OutputOptions};
use crate::schema::{self, SchemaOptions};

#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    pub compact: bool,
    pub schema: bool,
    pub types: bool,
    pub lines: bool,
    pub mono: bool,
    pub indent: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            compact: false,
            schema: false,
            types: false,
            lines: false,
            mono: false,
            indent: 2,
        }
    }
}

impl QueryOptions {
    fn output(&self) -> OutputOptions {
        OutputOptions {
            compact: self.compact,
            lines: self.lines,
            indent: self.indent,
            mono: self.mono,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The input text was not JSON or JSON Lines.
    Load,
    /// The query failed, or its result could not be rendered.
    Query,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{source}")]
pub struct TransformError {
    pub stage: Stage,
    pub source: EngineError,
}

/// Run `query` over `input` and return the HTML fragment to display.
pub fn transform(
    engine: &dyn QueryEngine,
    input: &str,
    query: &str,
    opts: &QueryOptions,
) -> Result<String, TransformError> {
    let data = load_json(input).map_err(|source| TransformError { stage: Stage::Load, source })?;

    let query_err = |source| TransformError { stage: Stage::Query, source };
    let response = engine.query(&data, query).map_err(query_err)?;

    if opts.schema {
        let lines = schema::create_schema(&response, &SchemaOptions { types: opts.types });
        schema::html_output(&lines, opts.mono).map_err(query_err)
    } else {
        let json = render::create_json(&response, &opts.output()).map_err(query_err)?;
        render::html_output(&json, opts.mono).map_err(query_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PathEngine;

    const INPUT: &str = r#"{"foo": {"bar": [1, 2, 3]}}"#;

    fn mono() -> QueryOptions {
        QueryOptions { mono: true, ..Default::default() }
    }

    #[test]
    fn test_default_example() {
        let html = transform(&PathEngine, INPUT, "_.foo", &mono()).unwrap();
        assert_eq!(
            html,
            "<div class=\"highlight\"><pre>{\n  &quot;bar&quot;: [\n    1,\n    2,\n    3\n  ]\n}</pre></div>"
        );
    }

    #[test]
    fn test_compact_and_schema_toggles() {
        let compact = QueryOptions { compact: true, ..mono() };
        let html = transform(&PathEngine, INPUT, "_.foo", &compact).unwrap();
        assert!(html.contains("{&quot;bar&quot;:[1,2,3]}"));

        let schema = QueryOptions { schema: true, ..mono() };
        let html = transform(&PathEngine, INPUT, "_.foo", &schema).unwrap();
        assert!(html.starts_with(r#"<div class="highlight schema">"#));
        assert!(html.contains("_.bar[2] = 3;"));
        assert!(html.contains("<br>"));
    }

    #[test]
    fn test_stage_is_reported() {
        let err = transform(&PathEngine, "{\"foo\": ", "_", &mono()).unwrap_err();
        assert_eq!(err.stage, Stage::Load);
        assert_eq!(err.source.kind(), "DecodeError");

        let err = transform(&PathEngine, INPUT, "_.nope", &mono()).unwrap_err();
        assert_eq!(err.stage, Stage::Query);
        assert_eq!(err.source.kind(), "AttributeError");
    }
}
