//! jc page — raw command output, parser selection, JSON output.

use axum::{extract::State, response::Html, Form};
use chrono::Utc;
use jelloweb_engine::{render, EngineError, VERSION};
use minijinja::{context, Value};
use serde::Serialize;
use tracing::{debug, info};

use crate::csrf;
use crate::error::WebError;
use crate::flash::{Flash, PARSE_FAILED};
use crate::forms::{FieldErrors, ParseForm};
use crate::state::SharedState;

pub const TITLE: &str = "jc web";

#[derive(Serialize)]
struct ParserChoice {
    name: &'static str,
    description: &'static str,
}

pub async fn jc_page(State(state): State<SharedState>) -> Result<Html<String>, WebError> {
    render_jc(&state, &ParseForm::default(), &FieldErrors::new(), &[], "")
}

pub async fn jc_submit(
    State(state): State<SharedState>,
    Form(form): Form<ParseForm>,
) -> Result<Html<String>, WebError> {
    let errors = form.validate(&state.parsers, &state.secret, state.csrf_time_limit(), Utc::now());
    if !errors.is_empty() {
        debug!(fields = ?errors.keys().collect::<Vec<_>>(), "jc form failed validation");
        return render_jc(&state, &form, &errors, &[], "");
    }

    let parsers = state.parsers.clone();
    let parser = form.parser.clone();
    let input = form.cli_input.clone();
    let parse_opts = form.parse_options();
    let output_opts = form.output_options(&state.config.render);

    let result = tokio::task::spawn_blocking(move || -> Result<String, EngineError> {
        let value = parsers.parse(&parser, &input, &parse_opts)?;
        let json = render::create_json(&value, &output_opts)?;
        render::html_output(&json, output_opts.mono)
    })
    .await?;

    match result {
        Ok(output) => {
            info!(parser = %form.parser, input_bytes = form.cli_input.len(), "Parse succeeded");
            render_jc(&state, &form, &errors, &[], &output)
        }
        Err(e) => {
            info!(parser = %form.parser, kind = e.kind(), "Parse failed");
            let flashes = [Flash::exception(PARSE_FAILED, &e)];
            render_jc(&state, &form, &errors, &flashes, "")
        }
    }
}

fn render_jc(
    state: &SharedState,
    form: &ParseForm,
    errors: &FieldErrors,
    flashes: &[Flash],
    output: &str,
) -> Result<Html<String>, WebError> {
    let parsers: Vec<ParserChoice> = state
        .parsers
        .iter()
        .map(|p| ParserChoice { name: p.name(), description: p.description() })
        .collect();
    let csrf_token = csrf::issue(&state.secret, Utc::now())?;

    let html = state.templates.get_template("jc.html")?.render(context! {
        title => TITLE,
        version => VERSION,
        form => form,
        parsers => parsers,
        errors => errors,
        flashes => flashes,
        csrf_token => csrf_token,
        output => Value::from_safe_string(output.to_string()),
    })?;
    Ok(Html(html))
}
