//! Form definitions and validation for the jello and jc pages.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use jelloweb_common::RenderConfig;
use jelloweb_engine::render::OutputOptions;
use jelloweb_engine::{ParseOptions, ParserRegistry, QueryOptions};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};

use crate::csrf;

pub const REQUIRED: &str = "This field is required.";
pub const NOT_A_CHOICE: &str = "Not a valid choice.";

pub const DEFAULT_JSON_INPUT: &str = r#"{"foo": {"bar": [1, 2, 3]}}"#;
pub const DEFAULT_QUERY: &str = "_.foo";
pub const DEFAULT_PARSER: &str = "env";

/// Field name → validation messages.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// Unchecked boxes are absent from the body; present ones are on unless
/// they carry an explicit false value.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(!matches!(value.trim().to_ascii_lowercase().as_str(), "" | "false" | "off" | "0"))
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.entry(field).or_default().push(REQUIRED.to_string());
    }
}

fn check_csrf(
    errors: &mut FieldErrors,
    token: &str,
    secret: &SecretString,
    time_limit: Duration,
    now: DateTime<Utc>,
) {
    if let Err(e) = csrf::verify(secret, token, now, time_limit) {
        errors.entry("csrf_token").or_default().push(e.to_string());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryForm {
    #[serde(default, skip_serializing)]
    pub csrf_token: String,
    #[serde(default)]
    pub json_input: String,
    #[serde(default)]
    pub query_input: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub compact: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub schema: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub types: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub lines: bool,
}

impl Default for QueryForm {
    fn default() -> Self {
        Self {
            csrf_token: String::new(),
            json_input: DEFAULT_JSON_INPUT.to_string(),
            query_input: DEFAULT_QUERY.to_string(),
            compact: false,
            schema: false,
            types: false,
            lines: false,
        }
    }
}

impl QueryForm {
    pub fn validate(
        &self,
        secret: &SecretString,
        time_limit: Duration,
        now: DateTime<Utc>,
    ) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_csrf(&mut errors, &self.csrf_token, secret, time_limit, now);
        require(&mut errors, "json_input", &self.json_input);
        require(&mut errors, "query_input", &self.query_input);
        errors
    }

    pub fn options(&self, render: &RenderConfig) -> QueryOptions {
        QueryOptions {
            compact: self.compact,
            schema: self.schema,
            types: self.types,
            lines: self.lines,
            mono: render.mono,
            indent: render.indent,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseForm {
    #[serde(default, skip_serializing)]
    pub csrf_token: String,
    #[serde(default)]
    pub cli_input: String,
    #[serde(default)]
    pub parser: String,
    #[serde(default, deserialize_with = "checkbox")]
    pub raw: bool,
    #[serde(default, deserialize_with = "checkbox")]
    pub pretty: bool,
}

impl Default for ParseForm {
    fn default() -> Self {
        Self {
            csrf_token: String::new(),
            cli_input: String::new(),
            parser: DEFAULT_PARSER.to_string(),
            raw: false,
            pretty: true,
        }
    }
}

impl ParseForm {
    pub fn validate(
        &self,
        parsers: &ParserRegistry,
        secret: &SecretString,
        time_limit: Duration,
        now: DateTime<Utc>,
    ) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_csrf(&mut errors, &self.csrf_token, secret, time_limit, now);
        require(&mut errors, "cli_input", &self.cli_input);
        if self.parser.trim().is_empty() {
            require(&mut errors, "parser", &self.parser);
        } else if !parsers.contains(&self.parser) {
            errors.entry("parser").or_default().push(NOT_A_CHOICE.to_string());
        }
        errors
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions { raw: self.raw }
    }

    pub fn output_options(&self, render: &RenderConfig) -> OutputOptions {
        OutputOptions {
            compact: !self.pretty,
            lines: false,
            indent: render.indent,
            mono: render.mono,
        }
    }
}
